//! docoutline CLI - PDF outline inference tool

mod batch;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docoutline::{
    render, DocumentSource, JsonFormat, OutlineConfig, OutlineExtractor, PdfSource,
};

#[derive(Parser)]
#[command(name = "docoutline")]
#[command(version)]
#[command(about = "Infer a title and H1-H3 outline from PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Render a Markdown table of contents instead of JSON
        #[arg(long, conflicts_with = "compact")]
        markdown: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Extract outlines for every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR", env = "DOCOUTLINE_INPUT")]
        input: PathBuf,

        /// Directory receiving one JSON file per PDF
        #[arg(value_name = "OUTPUT_DIR", env = "DOCOUTLINE_OUTPUT")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Show document information and detection statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Copy, Default)]
struct Tuning {
    /// Maximum pages to analyze
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Maximum headings to keep
    #[arg(long, value_name = "N")]
    max_headings: Option<usize>,

    /// Classify pages on a single thread
    #[arg(long)]
    sequential: bool,
}

impl Tuning {
    fn extractor(self) -> OutlineExtractor {
        let mut config = OutlineConfig::default();
        if let Some(pages) = self.max_pages {
            config = config.with_max_pages(pages);
        }
        if let Some(headings) = self.max_headings {
            config = config.with_max_headings(headings);
        }
        if self.sequential {
            config = config.sequential();
        }
        OutlineExtractor::new(config)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            compact,
            markdown,
            tuning,
        }) => cmd_outline(&input, output.as_deref(), compact, markdown, tuning),
        Some(Commands::Batch {
            input,
            output,
            compact,
            tuning,
        }) => cmd_batch(&input, &output, compact, tuning),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: print the outline if input is provided
            if let Some(input) = cli.input {
                cmd_outline(&input, None, false, false, Tuning::default())
            } else {
                println!("{}", "Usage: docoutline <FILE>".yellow());
                println!("       docoutline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    markdown: bool,
    tuning: Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let outline = tuning.extractor().extract_file(input);

    let rendered = if markdown {
        render::to_markdown(&outline)?
    } else {
        render::to_json(&outline, json_format(compact))?
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    compact: bool,
    tuning: Tuning,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = batch::run(input, output, &tuning.extractor(), json_format(compact), &pb)?;

    if report.created_input {
        pb.finish_and_clear();
        println!(
            "{} {} (add PDF files and run again)",
            "Created input directory".yellow(),
            input.display()
        );
        return Ok(());
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} outlines written to {}",
        "Done!".green().bold(),
        report.written.len(),
        output.display()
    );
    for (file, reason) in &report.failed {
        println!("  {} {}: {}", "✗".red(), file.display(), reason);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = PdfSource::open(input)?;
    let info = source.info();
    let (outline, stats) = OutlineExtractor::default().extract_with_stats(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.version());
    println!("{}: {}", "Pages".bold(), info.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if source.is_encrypted() { "Yes" } else { "No" }
    );

    if let Some(ref title) = info.title {
        println!("{}: {}", "Metadata title".bold(), title);
    }
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = info.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = info.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }

    println!();
    println!("{}", "Outline Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {:?}", "Selected title".bold(), outline.title);
    println!(
        "{}: {}/{} ({} failed)",
        "Pages analyzed".bold(),
        stats.pages_processed,
        stats.pages_available,
        stats.pages_failed
    );
    match stats.font_profile {
        Some(profile) => println!(
            "{}: median {:.1}pt, p75 {:.1}pt ({} glyphs)",
            "Font profile".bold(),
            profile.median,
            profile.p75,
            profile.samples
        ),
        None => println!("{}: {}", "Font profile".bold(), "insufficient glyphs".dimmed()),
    }
    println!("{}: {}", "Font candidates".bold(), stats.font_candidates);
    println!("{}: {}", "Pattern candidates".bold(), stats.pattern_candidates);
    println!("{}: {}", "Headings kept".bold(), stats.headings_kept);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline inference tool");
    println!();
    println!("License: MIT");
}
