use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;
use watch_sync_core::{RunObserver, RunPhase};

/// Spinner for the fetch phases, then a bar over the records being resolved.
/// Outside a terminal everything goes to structured logs instead.
pub struct SyncUI {
    bar: ProgressBar,
    interactive: bool,
}

impl SyncUI {
    pub fn new(quiet: bool) -> Self {
        let interactive = !quiet && is_interactive();
        let bar = if interactive {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(spinner_style());
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            ProgressBar::hidden()
        };

        if !interactive {
            tracing::debug!(
                operation = "ui_init",
                mode = "non_interactive",
                "Progress bars disabled, using structured logging"
            );
        }

        Self { bar, interactive }
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

impl RunObserver for SyncUI {
    fn phase_started(&self, phase: RunPhase) {
        let message = match phase {
            RunPhase::LoadingCache => "Loading cache...",
            RunPhase::Fetching => "Fetching watch history...",
            RunPhase::Resolving => "Resolving metadata...",
            RunPhase::Writing => "Writing history files...",
        };
        if self.interactive {
            self.bar.set_message(message);
        } else {
            tracing::info!(operation = "phase", phase = ?phase, "{}", message);
        }
    }

    fn records_to_resolve(&self, total: usize) {
        if self.interactive && total > 0 {
            self.bar.set_style(bar_style());
            self.bar.set_length(total as u64);
            self.bar.set_position(0);
        }
    }

    fn record_resolved(&self, done: usize, _total: usize) {
        if self.interactive {
            self.bar.set_position(done as u64);
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
