//! Console reporting
//!
//! Styled messages, per-file deduplication reports and the batch summary.

use crate::dedup::{render_value, DedupOutcome};
use crate::profile::FieldProfile;
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Number of duplicates listed in a file report
pub const DUPLICATE_PREVIEW: usize = 5;

/// Print the application banner
pub fn print_banner() {
    println!("{}", "Record cleanup - removing duplicates from JSON files".green().bold());
    println!("{}", "═".repeat(60).green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled progress bar over the input files
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {pos}/{len} files {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }

    pb.set_message(msg.to_string());
    pb
}

/// Lines of the duplicate preview for one file
pub fn duplicate_preview(outcome: &DedupOutcome, key_field: &str) -> Vec<String> {
    let mut lines: Vec<String> = outcome
        .duplicates
        .iter()
        .take(DUPLICATE_PREVIEW)
        .map(|d| {
            format!(
                "{} {}: '{}' (kept) vs '{}' (removed)",
                key_field,
                render_value(&d.key),
                d.retained,
                d.dropped
            )
        })
        .collect();

    if outcome.duplicates.len() > DUPLICATE_PREVIEW {
        lines.push(format!(
            "... and {} more duplicates",
            outcome.duplicates.len() - DUPLICATE_PREVIEW
        ));
    }

    lines
}

/// Reduction line, e.g. "3 records removed (12.5%)"
pub fn reduction_line(outcome: &DedupOutcome) -> String {
    format!(
        "{} records removed ({:.1}%)",
        format_number(outcome.reduction() as u64),
        outcome.reduction_percent()
    )
}

/// Print the report for one deduplicated file
pub fn print_file_report(profile: &FieldProfile, outcome: &DedupOutcome) {
    print_info(&format!(
        "Total {} before cleanup: {}",
        profile.description,
        format_number(outcome.total() as u64)
    ));
    print_info(&format!("Unique key: {}", profile.key_field));

    for record in &outcome.skipped {
        print_warning(&format!(
            "Record without {} found: {}",
            profile.key_field,
            crate::dedup::display_value(record, &profile.display_field)
        ));
    }

    print_info(&format!(
        "Duplicates removed: {}",
        format_number(outcome.duplicates.len() as u64)
    ));
    print_success(&format!(
        "{} after cleanup: {}",
        profile.description,
        format_number(outcome.unique.len() as u64)
    ));

    if !outcome.duplicates.is_empty() {
        print_header("Duplicates removed (sample)");
        for line in duplicate_preview(outcome, &profile.key_field) {
            print_bullet(&line);
        }
    }
}

/// Outcome of one file in a batch
#[derive(Debug)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub bytes_read: u64,
    pub total: usize,
    pub unique: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

/// Aggregated statistics for a batch run
#[derive(Debug)]
pub struct ProcessingStats {
    pub total_files: u64,
    pub succeeded_files: u64,
    pub bytes_read: u64,
    pub total_records: u64,
    pub unique_records: u64,
    pub duplicate_records: u64,
    pub skipped_records: u64,
    pub start_time: Instant,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            total_files: 0,
            succeeded_files: 0,
            bytes_read: 0,
            total_records: 0,
            unique_records: 0,
            duplicate_records: 0,
            skipped_records: 0,
            start_time: Instant::now(),
        }
    }

    pub fn add_file(&mut self) {
        self.total_files += 1;
    }

    pub fn complete_file(&mut self, summary: &FileSummary) {
        self.succeeded_files += 1;
        self.bytes_read += summary.bytes_read;
        self.total_records += summary.total as u64;
        self.unique_records += summary.unique as u64;
        self.duplicate_records += summary.duplicates as u64;
        self.skipped_records += summary.skipped as u64;
    }

    pub fn failed_files(&self) -> u64 {
        self.total_files - self.succeeded_files
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", "                    CLEANUP COMPLETE".green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        println!(
            "  {} {}/{}",
            "Files cleaned:  ".green(),
            self.succeeded_files,
            self.total_files
        );
        println!("  {} {}", "Data read:      ".green(), ByteSize(self.bytes_read));
        println!();

        println!("  {} {}", "Total records:  ".green(), format_number(self.total_records));
        println!("  {} {}", "Duplicates:     ".yellow(), format_number(self.duplicate_records));
        if self.skipped_records > 0 {
            println!("  {} {}", "Without key:    ".yellow(), format_number(self.skipped_records));
        }
        println!(
            "  {} {}",
            "Unique output:  ".green().bold(),
            format_number(self.unique_records).green().bold()
        );

        let failed = self.failed_files();
        if failed > 0 {
            println!("  {} {}", "Failed files:   ".red(), format_number(failed).red());
        }

        println!();
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        println!();
        println!("{}", "═".repeat(60).green());
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Print how to replace originals with their cleaned versions
pub fn print_replace_hints(files: &[(&Path, &Path)]) {
    if files.is_empty() {
        return;
    }

    print_info("Original files are kept; cleaned files carry the '_clean' suffix.");
    print_header("To replace the originals with the cleaned versions:");
    for (input, output) in files {
        println!("    mv {} {}", output.display(), input.display());
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::deduplicate;
    use crate::dedup::Record;
    use serde_json::json;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
    }

    #[test]
    fn test_duplicate_preview_is_bounded() {
        let mut items = vec![json!({"k": 0, "n": "first"})];
        for i in 1..=8 {
            items.push(json!({"k": 0, "n": format!("copy{}", i)}));
        }
        let records: Vec<Record> = serde_json::from_value(json!(items)).unwrap();
        let outcome = deduplicate(records, "k", "n");

        let lines = duplicate_preview(&outcome, "k");

        assert_eq!(lines.len(), DUPLICATE_PREVIEW + 1);
        assert_eq!(lines[0], "k 0: 'first' (kept) vs 'copy1' (removed)");
        assert_eq!(lines[5], "... and 3 more duplicates");
    }

    #[test]
    fn test_reduction_line() {
        let records: Vec<Record> = serde_json::from_value(json!([
            {"Code UIC": "1", "Nom Gare": "A"},
            {"Code UIC": "2", "Nom Gare": "B"},
            {"Code UIC": "1", "Nom Gare": "A2"}
        ]))
        .unwrap();
        let outcome = deduplicate(records, "Code UIC", "Nom Gare");

        assert_eq!(reduction_line(&outcome), "1 records removed (33.3%)");
        assert_eq!(
            duplicate_preview(&outcome, "Code UIC"),
            vec!["Code UIC 1: 'A' (kept) vs 'A2' (removed)".to_string()]
        );
    }

    #[test]
    fn test_stats() {
        let mut stats = ProcessingStats::new();
        stats.add_file();
        stats.add_file();
        stats.complete_file(&FileSummary {
            input: PathBuf::from("gare.json"),
            output: None,
            bytes_read: 100,
            total: 10,
            unique: 7,
            duplicates: 2,
            skipped: 1,
        });

        assert_eq!(stats.total_records, 10);
        assert_eq!(stats.duplicate_records, 2);
        assert_eq!(stats.failed_files(), 1);
    }
}
