//! docmod CLI - legacy DOCX restructuring tool

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docmod::{ConvertOptions, Converter, RenderOptions, SegmentOptions};

#[derive(Parser)]
#[command(name = "docmod")]
#[command(version)]
#[command(about = "Restructure legacy numbered-heading DOCX files into a target template", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one document into the target template
    Convert {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Target template DOCX file
        #[arg(short, long, value_name = "FILE", env = "DOCMOD_TEMPLATE")]
        template: Option<PathBuf>,

        /// Output file (defaults to <input stem>_converted.docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Fail when the document contains no recognizable headings
        #[arg(long)]
        strict: bool,

        /// Template paragraph text marking the history insertion point
        #[arg(long, value_name = "TEXT")]
        history_marker: Option<String>,
    },

    /// Convert every .docx in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Target template DOCX file
        #[arg(short, long, value_name = "FILE", env = "DOCMOD_TEMPLATE")]
        template: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "converted")]
        output: PathBuf,

        /// Fail documents that contain no recognizable headings
        #[arg(long)]
        strict: bool,
    },

    /// Show a document's detected structure without converting it
    Inspect {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            template,
            output,
            strict,
            history_marker,
        } => cmd_convert(
            &input,
            template.as_deref(),
            output.as_deref(),
            strict,
            history_marker.as_deref(),
        ),
        Commands::Batch {
            input,
            template,
            output,
            strict,
        } => cmd_batch(&input, &template, &output, strict),
        Commands::Inspect { input, json } => cmd_inspect(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(strict: bool, history_marker: Option<&str>) -> ConvertOptions {
    let mut options = ConvertOptions::new();
    if strict {
        options = options.with_segment_options(SegmentOptions::default().strict());
    }
    if let Some(marker) = history_marker {
        options = options.with_render_options(RenderOptions::new().with_history_marker(marker));
    }
    options
}

fn cmd_convert(
    input: &Path,
    template: Option<&Path>,
    output: Option<&Path>,
    strict: bool,
    history_marker: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        input.with_file_name(format!("{}_converted.docx", stem))
    });

    let converter = Converter::new(build_options(strict, history_marker));
    let result = match template {
        Some(template) => converter.convert(input, template, &output_path)?,
        None => converter.convert_without_template(input, &output_path)?,
    };

    println!(
        "{} {} ({} sections, {} history entries)",
        "Converted".green().bold(),
        result.output_path.display(),
        result.heading_count(),
        result.history.len()
    );
    for warning in &result.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    template: &Path,
    output: &Path,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::new(build_options(strict, None));

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Converting {}...", input.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let summary = converter.convert_dir(input, template, output)?;
    pb.finish_and_clear();

    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(result) => {
                println!(
                    "  {} {} ({} warnings)",
                    "ok".green(),
                    outcome.source.display(),
                    result.warnings.len()
                );
                for warning in &result.warnings {
                    println!("     {} {}", "warning:".yellow(), warning);
                }
            }
            Err(e) => {
                println!("  {} {}: {}", "failed".red(), outcome.source.display(), e);
            }
        }
    }

    println!(
        "\n{} {} converted, {} failed, {} warnings",
        "Done!".green().bold(),
        summary.converted(),
        summary.failed(),
        summary.warning_count()
    );

    if summary.failed() > 0 {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_inspect(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let inspection = docmod::inspect_file(input, &ConvertOptions::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    println!("{}", "Document Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print!("{}", inspection.to_text());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docmod".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Legacy DOCX restructuring tool");
    println!();
    println!("License: MIT");
}
