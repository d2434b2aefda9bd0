use std::fmt::{Display, Formatter, Result as FmtResult};

/// Emitted once per processed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSnapshot {
    /// 1-based.
    pub batch: usize,
    pub batch_size: usize,
    pub rows_seen: u64,
    pub mean_loss: f64,
    /// CPU seconds since the run started.
    pub seconds: f64,
}

impl BatchSnapshot {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }
}

impl Display for BatchSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "batch={}, size={}, seen={}, loss={}, t={:.6}s",
            self.batch,
            self.batch_size,
            self.rows_seen,
            Self::fmtv(self.mean_loss),
            self.seconds
        )
    }
}

/// Summary of a whole batch-update run.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub batches: usize,
    pub rows: u64,
    /// Row-weighted mean of the per-batch losses. NaN when nothing was replayed.
    pub mean_loss: f64,
    pub seconds: f64,
}

impl UpdateReport {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl Display for UpdateReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "batches={}, rows={}, loss={}, t={:.6}s",
            self.batches,
            self.rows,
            BatchSnapshot::fmtv(self.mean_loss),
            self.seconds
        )
    }
}
