//! Terminal progress for scenario runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::common::CallFailure;
use crate::engine::{RunObserver, RunReport};
use crate::results::CapturedResponse;

/// Prints each call and keeps a progress bar over the whole run
pub struct TerminalObserver {
    bar: ProgressBar,
    verbose: bool,
}

impl TerminalObserver {
    pub fn new(total_calls: u64, verbose: bool) -> Self {
        let bar = ProgressBar::new(total_calls);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar, verbose }
    }
}

impl RunObserver for TerminalObserver {
    fn on_iteration_start(&mut self, iteration: usize, total: usize) {
        self.bar.println(format!(
            "\n{} {}/{}",
            "Test Iteration".blue().bold(),
            iteration + 1,
            total
        ));
    }

    fn on_progress(&mut self, api: &str, iteration: usize, total: usize) {
        self.bar
            .set_message(format!("{} {}/{}", api, iteration + 1, total));
    }

    fn on_skip(&mut self, _api: &str, reason: &CallFailure) {
        self.bar
            .println(format!("  {} {}, skipping", "⚠".yellow(), reason));
    }

    fn on_response(
        &mut self,
        api: &str,
        _iteration: usize,
        response: &CapturedResponse,
        counted: bool,
    ) {
        self.bar.inc(1);

        let status = response
            .status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "---".to_string());
        let mark = if counted { "✓".green() } else { "✗".red() };
        let detail = response
            .error
            .as_ref()
            .map(|e| format!(" ({})", e).dimmed().to_string())
            .unwrap_or_default();
        self.bar.println(format!("  {} {} {}{}", mark, api, status.dimmed(), detail));

        if self.verbose {
            if let Some(body) = &response.body {
                self.bar.println(format!("      {}", body.to_string().dimmed()));
            }
        }
    }

    fn on_finished(&mut self, report: &RunReport) {
        self.bar.finish_and_clear();

        println!("\n{}", "Results:".cyan());
        for tally in &report.tallies {
            let mark = if tally.all_passed() {
                "✔".green()
            } else {
                "✗".red()
            };
            println!(
                "  {} {}: Passed {}/{}",
                mark, tally.api, tally.passed, tally.total
            );
        }
    }
}
