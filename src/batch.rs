//! Batch processing of a directory of PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::detect::has_pdf_extension;
use crate::error::Result;
use crate::options::OutlineOptions;
use crate::parser::{DocumentLoader, LopdfLoader};
use crate::processor::{display_name, DocumentProcessor};
use crate::render::write_json;

/// Extension of the files the batch writes.
pub const OUTPUT_EXTENSION: &str = "json";

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Title and outline extracted and written
    Extracted,
    /// Document unreadable; fallback result written
    Degraded(String),
    /// Result could not be written
    WriteFailed(String),
}

impl FileStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FileStatus::Extracted)
    }
}

/// Per-file report.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Input PDF
    pub input: PathBuf,
    /// JSON file written (or attempted)
    pub output: PathBuf,
    /// What happened
    pub status: FileStatus,
    /// Number of headings in the result
    pub heading_count: usize,
    /// Wall-clock time spent on the file, including the write
    pub elapsed: Duration,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One report per input file, in processing order
    pub files: Vec<FileReport>,
    /// Wall-clock time of the whole run
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn extracted(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Extracted))
    }

    pub fn degraded(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Degraded(_)))
    }

    pub fn write_failures(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::WriteFailed(_)))
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

/// Progress notifications emitted during [`BatchRunner::run_with`].
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// Inputs enumerated
    Started { total: usize },
    /// About to process a file (0-based index)
    FileStarted { index: usize, path: &'a Path },
    /// A file is done
    FileFinished { index: usize, report: &'a FileReport },
}

/// Processes every PDF in a directory and writes one JSON file per input.
///
/// Files are handled one at a time, in directory enumeration order. A
/// failure on one file never stops the run.
pub struct BatchRunner<L = LopdfLoader> {
    processor: DocumentProcessor<L>,
    output_dir: PathBuf,
}

impl BatchRunner<LopdfLoader> {
    /// Create a lopdf-backed runner writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, options: OutlineOptions) -> Self {
        Self::with_processor(DocumentProcessor::new(options), output_dir)
    }
}

impl<L: DocumentLoader> BatchRunner<L> {
    /// Create a runner around an existing processor.
    pub fn with_processor(processor: DocumentProcessor<L>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            processor,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the result for `input` is written: `<output_dir>/<stem>.json`.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        // Not `with_extension`: stems like "v1.2" already contain a dot.
        let mut name = input.file_stem().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        self.output_dir.join(name)
    }

    /// Run over `input_dir` without progress callbacks.
    pub fn run(&self, input_dir: &Path) -> Result<BatchReport> {
        self.run_with(input_dir, |_| {})
    }

    /// Run over `input_dir`, reporting progress to `on_event`.
    ///
    /// Only failing to list the input directory or to create the output
    /// directory is an error; per-file problems land in the report.
    pub fn run_with<F>(&self, input_dir: &Path, mut on_event: F) -> Result<BatchReport>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let started = Instant::now();
        let inputs = collect_inputs(input_dir)?;
        fs::create_dir_all(&self.output_dir)?;
        log::info!(
            "Found {} PDF files in {}",
            inputs.len(),
            input_dir.display()
        );
        on_event(BatchEvent::Started {
            total: inputs.len(),
        });

        let mut report = BatchReport::default();
        for (index, input) in inputs.iter().enumerate() {
            on_event(BatchEvent::FileStarted { index, path: input });
            let file_report = self.process_file(input);
            on_event(BatchEvent::FileFinished {
                index,
                report: &file_report,
            });
            report.files.push(file_report);
        }

        report.elapsed = started.elapsed();
        log::info!(
            "Batch finished: {} extracted, {} degraded, {} write failures in {:.2} sec",
            report.extracted(),
            report.degraded(),
            report.write_failures(),
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    /// Process one file and write its JSON. Never fails; the outcome is in
    /// the returned report.
    pub fn process_file(&self, input: &Path) -> FileReport {
        let started = Instant::now();
        let name = display_name(input);
        log::info!("Processing: {}", name);

        let processed = self.processor.process(input);
        let output = self.output_path_for(input);
        let format = self.processor.options().json_format;

        let status = match write_json(&processed.result, &output, format) {
            Ok(()) => {
                log::info!("Output saved to {}", output.display());
                match processed.error {
                    Some(e) => FileStatus::Degraded(e.to_string()),
                    None => FileStatus::Extracted,
                }
            }
            Err(e) => {
                log::error!("Failed to write {}: {}", output.display(), e);
                FileStatus::WriteFailed(e.to_string())
            }
        };

        let elapsed = started.elapsed();
        log::info!("Done {} in {:.2} sec", name, elapsed.as_secs_f64());

        FileReport {
            input: input.to_path_buf(),
            output,
            status,
            heading_count: processed.result.outline.len(),
            elapsed,
        }
    }
}

/// Regular files directly inside `dir` with a `.pdf` extension, in
/// directory enumeration order. Subdirectories are not descended into.
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && has_pdf_extension(&path) {
            inputs.push(path);
        }
    }
    Ok(inputs)
}
