//! Size metrics for a single guard cycle

use serde::Serialize;

/// Size metrics for before/after comparison
///
/// Tracks a file's size before normalization and after minification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeMetrics {
    /// File size before minification (bytes)
    pub before_bytes: u64,
    /// File size after minification (bytes)
    pub after_bytes: u64,
}

impl SizeMetrics {
    /// Calculate size reduction in bytes
    pub fn reduction_bytes(&self) -> i64 {
        self.before_bytes as i64 - self.after_bytes as i64
    }

    /// Calculate size reduction as percentage
    pub fn reduction_percent(&self) -> f64 {
        if self.before_bytes == 0 {
            return 0.0;
        }
        (self.reduction_bytes() as f64 / self.before_bytes as f64) * 100.0
    }

    /// Check whether the minified file is larger than the original
    pub fn grew(&self) -> bool {
        self.after_bytes > self.before_bytes
    }
}
