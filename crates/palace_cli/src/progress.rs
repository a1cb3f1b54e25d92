use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use palace_core::{CrawlStatus, ProgressView};
use palace_engine::ProgressSink;

/// Crawl progress as a percentage bar on stderr. Hidden until the first report.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::hidden());
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        bar.set_style(style);
        Self { bar }
    }

    /// Percentage currently shown.
    pub fn percent(&self) -> u64 {
        self.bar.position()
    }

    pub fn is_visible(&self) -> bool {
        !self.bar.is_hidden()
    }
}

impl ProgressSink for TerminalProgress {
    fn set_progress(&self, completed: u64, total: u64, status: CrawlStatus) {
        let view = ProgressView::reporting(completed, total, status);
        if self.bar.is_hidden() {
            self.bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        self.bar.set_position(u64::from(view.percent()));
        self.bar
            .set_message(format!("Status: {status} | {completed}/{total} pages"));
    }

    fn reset(&self) {
        self.bar.finish_and_clear();
        self.bar.reset();
        self.bar.set_message("");
        self.bar.set_draw_target(ProgressDrawTarget::hidden());
    }
}
