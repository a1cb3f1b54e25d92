use crate::CrawlStatus;

/// What a progress display should currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressView {
    pub completed: u64,
    pub total: u64,
    pub status: Option<CrawlStatus>,
    pub visible: bool,
}

impl ProgressView {
    /// Hidden and zeroed.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn reporting(completed: u64, total: u64, status: CrawlStatus) -> Self {
        Self {
            completed,
            total,
            status: Some(status),
            visible: true,
        }
    }

    /// Whole-number percentage, 0 when the total is unknown, never above 100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.completed.saturating_mul(100) / self.total;
        pct.min(100) as u8
    }
}
