//! Document model: blocks, runs, tables, sections, and revision records.
//!
//! The adapter produces an ordered `Vec<Block>` per source document; every
//! later stage is a pure function over that sequence or views derived from
//! it. Nothing in the model holds state across documents, which is what
//! makes document-granular parallelism safe.

mod block;
mod revision;
mod section;
mod table;

pub use block::{Block, Paragraph, Run, RunStyle};
pub use revision::{RevisionEntry, RevisionHistory};
pub use section::{HeadingInfo, Section};
pub use table::{Table, TableCell, TableRow};
