//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: timestamped,
//! severity-tagged log lines, progress bars for sweep and reversal passes,
//! and the per-category summary table.

use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Manages all CLI output with consistent styling and formatting.
///
/// Every log line carries a local timestamp so a long watch session reads
/// like a log file.
pub struct OutputFormatter;

impl OutputFormatter {
    fn timestamp() -> ColoredString {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
    }

    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {} {}", Self::timestamp(), "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {} {}", Self::timestamp(), "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {} {}", Self::timestamp(), "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{} {}", Self::timestamp(), message.cyan());
    }

    /// Prints a section header.
    pub fn header(title: &str) {
        println!("\n{}", title.bold());
        println!("{}", "=".repeat(title.len()));
    }

    /// Creates a styled progress bar for a pass over `total` files.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dropsort::output::OutputFormatter;
    ///
    /// let pb = OutputFormatter::create_progress_bar(42);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a summary table of moved files by category.
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        // Sort categories for consistent output
        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let max_category_len = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in &categories {
            let file_word = if **count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_category_len
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}
