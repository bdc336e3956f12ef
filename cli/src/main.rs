//! pdfoutline CLI - PDF title and heading outline extraction

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::outline::{
    DEFAULT_BOLD_FLAG, DEFAULT_H1_SIZE, DEFAULT_H2_SIZE, DEFAULT_H3_SIZE, DEFAULT_MIN_TEXT_LEN,
};
use pdfoutline::{
    BatchEvent, BatchRunner, DocumentProcessor, FileReport, FileStatus, HeadingConfig,
    HeadingLevel, OutlineOptions,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract document titles and H1-H3 outlines from PDFs to JSON", long_about = None)]
struct Cli {
    /// Directory of PDF files to process
    #[arg(value_name = "INPUT_DIR", env = "PDFOUTLINE_INPUT", default_value = "input")]
    input: PathBuf,

    /// Directory to write JSON files into
    #[arg(value_name = "OUTPUT_DIR", env = "PDFOUTLINE_OUTPUT", default_value = "output")]
    output: PathBuf,

    #[command(flatten)]
    heading: HeadingArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in a directory
    Batch {
        /// Directory of PDF files
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Process a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

/// Heading detection thresholds shared by all commands.
#[derive(Args)]
struct HeadingArgs {
    /// Minimum font size (pt) for H1 headings and the title
    #[arg(long = "h1", value_name = "PT", global = true, default_value_t = DEFAULT_H1_SIZE)]
    h1: f32,

    /// Minimum font size (pt) for H2 headings
    #[arg(long = "h2", value_name = "PT", global = true, default_value_t = DEFAULT_H2_SIZE)]
    h2: f32,

    /// Minimum font size (pt) for H3 headings
    #[arg(long = "h3", value_name = "PT", global = true, default_value_t = DEFAULT_H3_SIZE)]
    h3: f32,

    /// Style flags value that marks small text as an H3
    #[arg(long, value_name = "FLAGS", global = true, default_value_t = DEFAULT_BOLD_FLAG)]
    bold_flag: u32,

    /// Minimum number of characters for a heading
    #[arg(long = "min-len", value_name = "N", global = true, default_value_t = DEFAULT_MIN_TEXT_LEN)]
    min_len: usize,

    /// Fall back to the file name when any page cannot be decoded
    #[arg(long, global = true)]
    strict: bool,
}

impl HeadingArgs {
    fn to_options(&self, compact: bool) -> Result<OutlineOptions, Box<dyn std::error::Error>> {
        let config = HeadingConfig::new()
            .with_sizes(self.h1, self.h2, self.h3)
            .with_bold_flag(self.bold_flag)
            .with_min_text_len(self.min_len);
        config.validate()?;

        let mut options = OutlineOptions::new().with_heading_config(config);
        if self.strict {
            options = options.strict();
        }
        if compact {
            options = options.compact();
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            input,
            output,
            compact,
        }) => cli
            .heading
            .to_options(compact)
            .and_then(|options| cmd_batch(&input, &output, options)),
        Some(Commands::File {
            input,
            output,
            compact,
        }) => cli
            .heading
            .to_options(compact)
            .and_then(|options| cmd_file(&input, output.as_deref(), options)),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cli
            .heading
            .to_options(false)
            .and_then(|options| cmd_batch(&cli.input, &cli.output, options)),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    options: OutlineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Batch {} -> {} with {:?}", input.display(), output.display(), options);
    let runner = BatchRunner::new(output, options);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = runner.run_with(input, |event| match event {
        BatchEvent::Started { total } => pb.set_length(total as u64),
        BatchEvent::FileStarted { path, .. } => {
            let name = file_name(path);
            pb.println(format!("\n{} {}", "[PROCESSING]".cyan().bold(), name));
            pb.set_message(name);
        }
        BatchEvent::FileFinished { report, .. } => {
            pb.println(status_line(report));
            pb.inc(1);
        }
    })?;

    pb.finish_and_clear();

    if report.total() == 0 {
        println!(
            "{} no PDF files found in {}",
            "Warning:".yellow(),
            input.display()
        );
        return Ok(());
    }

    println!("\n{}", "Summary".green().bold());
    println!("  {} {} extracted", "├─".dimmed(), report.extracted());
    println!("  {} {} degraded", "├─".dimmed(), report.degraded());
    println!("  {} {} write failures", "├─".dimmed(), report.write_failures());
    println!(
        "  {} {} files in {:.2} sec -> {}",
        "└─".dimmed(),
        report.total(),
        report.elapsed.as_secs_f64(),
        output.display()
    );

    Ok(())
}

fn status_line(report: &FileReport) -> String {
    let name = file_name(&report.input);
    let secs = report.elapsed.as_secs_f64();
    match &report.status {
        FileStatus::Extracted => format!(
            "{} {} in {:.2}s ({} headings)",
            "[DONE]".green().bold(),
            name,
            secs,
            report.heading_count
        ),
        FileStatus::Degraded(reason) => format!(
            "{} Failed to open {}: {}\n{} {} in {:.2}s (fallback written)",
            "[ERROR]".red().bold(),
            name,
            reason,
            "[DONE]".yellow().bold(),
            name,
            secs
        ),
        FileStatus::WriteFailed(reason) => format!(
            "{} Failed to write {}: {}",
            "[ERROR]".red().bold(),
            report.output.display(),
            reason
        ),
    }
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    options: OutlineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("File {} with {:?}", input.display(), options);
    let format = options.json_format;
    let processed = DocumentProcessor::new(options).process(input);

    if let Some(ref e) = processed.error {
        eprintln!(
            "{} Failed to open {}: {}",
            "Warning:".yellow(),
            input.display(),
            e
        );
    }

    let json = pdfoutline::render::to_json(&processed.result, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        let result = &processed.result;
        println!(
            "{} {} ({} H1, {} H2, {} H3)",
            "Saved to".green(),
            path.display(),
            result.count_level(HeadingLevel::H1),
            result.count_level(HeadingLevel::H2),
            result.count_level(HeadingLevel::H3)
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and outline extraction tool");
    println!();
    println!("License: MIT");
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
