//! Batch processing
//!
//! Runs read → deduplicate → report → write for each input file. A failure
//! is confined to its own file; the batch always visits every input.

use crate::cli::Args;
use crate::dedup::{DedupOutcome, Deduplicator};
use crate::encoding::read_records;
use crate::error::{CleanError, Result};
use crate::output::{ensure_output_dir, is_clean_output, output_path, write_records};
use crate::profile::{FieldProfile, ProfileTable};
use crate::progress::{
    create_progress_bar, print_error, print_file_report, print_header, print_info,
    print_replace_hints, print_success, reduction_line, FileSummary,
    ProcessingStats,
};

use bytesize::ByteSize;
use hashbrown::HashMap;
use indicatif::ProgressBar;
use std::error::Error as _;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Processor configuration
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    pub output_dir: Option<PathBuf>,
    pub recursive: bool,
    pub explicit_profile: Option<FieldProfile>,
    pub dry_run: bool,
    pub quiet: bool,
    pub verbose: bool,
}

impl ProcessorConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        args.validate()?;
        Ok(Self {
            output_dir: args.output_dir.clone(),
            recursive: args.recursive,
            explicit_profile: args.explicit_profile(),
            dry_run: args.dry_run,
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }
}

/// Result of cleaning one input
#[derive(Debug)]
pub struct FileResult {
    pub input: PathBuf,
    pub result: Result<FileSummary>,
}

/// Results for every input of a batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileResult>,
}

impl BatchReport {
    /// True only when every file was cleaned
    pub fn success(&self) -> bool {
        self.files.iter().all(|f| f.result.is_ok())
    }

    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &CleanError)> {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|e| (f.input.as_path(), e)))
    }
}

/// One entry of the expanded input list
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    File(PathBuf),
    /// Directory argument holding no JSON files
    EmptyDir(PathBuf),
}

impl Input {
    fn path(&self) -> &Path {
        match self {
            Self::File(p) | Self::EmptyDir(p) => p,
        }
    }
}

/// Output path to the input that produced it
type ClaimedOutputs = HashMap<PathBuf, PathBuf>;

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
    profiles: ProfileTable,
}

impl Processor {
    pub fn new(config: ProcessorConfig, profiles: ProfileTable) -> Self {
        Self { config, profiles }
    }

    /// Clean every input, continuing past per-file failures
    pub fn process(&self, inputs: &[PathBuf]) -> anyhow::Result<BatchReport> {
        let files = self.collect_files(inputs);
        let mut stats = ProcessingStats::new();
        let mut report = BatchReport::default();

        if let Some(ref dir) = self.config.output_dir {
            if !self.config.dry_run {
                ensure_output_dir(dir)?;
            }
        }

        let pb = if self.config.quiet {
            ProgressBar::hidden()
        } else {
            create_progress_bar(files.len() as u64, "Cleaning...")
        };

        let total = files.len();
        let mut claimed = ClaimedOutputs::new();
        for (i, input) in files.into_iter().enumerate() {
            stats.add_file();

            pb.set_message(format!("{}", input.path().display()));

            // Keep per-file output from tearing the bar
            let result = pb.suspend(|| {
                if !self.config.quiet {
                    print_header(&format!("[{}/{}] {}", i + 1, total, input.path().display()));
                }
                let result = self.clean_input(&input, &mut claimed);
                if let Err(ref e) = result {
                    log::debug!("Failed to clean {:?}: {}", input.path(), e.kind());
                    report_error(e);
                }
                result
            });
            if let Ok(ref summary) = result {
                stats.complete_file(summary);
            }

            report.files.push(FileResult {
                input: input.path().to_path_buf(),
                result,
            });
            pb.inc(1);
        }

        pb.finish_and_clear();

        if !self.config.quiet {
            stats.print_summary();

            let written: Vec<(&Path, &Path)> = report
                .files
                .iter()
                .filter_map(|f| match f.result {
                    Ok(ref s) => s.output.as_deref().map(|out| (f.input.as_path(), out)),
                    Err(_) => None,
                })
                .collect();
            print_replace_hints(&written);
        }

        Ok(report)
    }

    /// Expand directory inputs into their `.json` files
    ///
    /// Plain paths are kept as given, missing or not, so each one gets its
    /// own result. A directory without JSON files is kept as a failed input.
    fn collect_files(&self, inputs: &[PathBuf]) -> Vec<Input> {
        let mut files = Vec::new();

        for input in inputs {
            if !input.is_dir() {
                files.push(Input::File(input.clone()));
                continue;
            }

            let walker = if self.config.recursive {
                WalkDir::new(input)
            } else {
                WalkDir::new(input).max_depth(1)
            };

            let mut found: Vec<PathBuf> = walker
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file())
                .filter(|p| {
                    p.extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.eq_ignore_ascii_case("json"))
                        .unwrap_or(false)
                })
                .filter(|p| !is_clean_output(p))
                .collect();
            found.sort();

            log::debug!("Found {} JSON files under {:?}", found.len(), input);
            if found.is_empty() {
                files.push(Input::EmptyDir(input.clone()));
            }
            files.extend(found.into_iter().map(Input::File));
        }

        files
    }

    /// Clean one expanded input, refusing outputs already used in this batch
    fn clean_input(&self, input: &Input, claimed: &mut ClaimedOutputs) -> Result<FileSummary> {
        let path = match input {
            Input::EmptyDir(dir) => {
                return Err(CleanError::NoInputFiles { path: dir.clone() });
            }
            Input::File(path) => path,
        };

        let output = output_path(path, self.config.output_dir.as_deref());
        if let Some(first) = claimed.get(&output) {
            return Err(CleanError::OutputCollision {
                path: path.clone(),
                output,
                claimed_by: first.clone(),
            });
        }

        let summary = self.process_file(path)?;
        claimed.insert(output, path.clone());
        Ok(summary)
    }

    /// Clean a single file
    pub fn process_file(&self, path: &Path) -> Result<FileSummary> {
        // Profile first: an unknown file is rejected before its records are read
        let profile = self
            .profiles
            .resolve(path, self.config.explicit_profile.as_ref())?;
        log::debug!("Using key {:?} for {:?}", profile.key_field, path);

        let loaded = read_records(path)?;
        if self.config.verbose && !self.config.quiet {
            print_info(&format!(
                "Read {} ({}, {})",
                path.display(),
                ByteSize(loaded.bytes),
                loaded.encoding.name
            ));
        }

        let outcome = Deduplicator::new(profile).run(loaded.records);
        log::info!(
            "{:?}: {} records, {} duplicates, {} without key",
            path,
            outcome.total(),
            outcome.duplicates.len(),
            outcome.skipped.len()
        );

        if !self.config.quiet {
            print_file_report(profile, &outcome);
        }

        let output = if self.config.dry_run {
            if !self.config.quiet {
                print_info("Dry run: no file written");
            }
            None
        } else {
            let out = output_path(path, self.config.output_dir.as_deref());
            write_records(&out, &outcome.unique)?;
            if !self.config.quiet {
                print_success(&format!("Cleaned file written to {}", out.display()));
            }
            Some(out)
        };

        if !self.config.quiet {
            print_info(&format!("Reduction: {}", reduction_line(&outcome)));
        }

        Ok(summarize(path, output, loaded.bytes, &outcome))
    }
}

fn summarize(input: &Path, output: Option<PathBuf>, bytes_read: u64, outcome: &DedupOutcome) -> FileSummary {
    FileSummary {
        input: input.to_path_buf(),
        output,
        bytes_read,
        total: outcome.total(),
        unique: outcome.unique.len(),
        duplicates: outcome.duplicates.len(),
        skipped: outcome.skipped.len(),
    }
}

/// Print an error with its chain of causes
fn report_error(err: &CleanError) {
    print_error(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        print_error(&format!("  Caused by: {}", cause));
        source = cause.source();
    }
}
