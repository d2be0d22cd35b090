//! Shared formatting utilities for size display and console output

use console::Emoji;

use crate::pipeline::metrics::SizeMetrics;

/// Rocket emoji for the start of a run
pub const ROCKET: Emoji = Emoji("🚀 ", "> ");

/// Checkmark emoji for committed files
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Crossmark emoji for failed files
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Sparkles emoji for completion
pub const SPARKLES: Emoji = Emoji("✨", "*");

/// Info emoji for skipped files and notes
pub const INFO: Emoji = Emoji("ℹ️ ", "i");

/// Chart emoji for the run summary
pub const CHART: Emoji = Emoji("📊", "~");

/// Warning emoji for reverted files and missing tools
pub const WARNING: Emoji = Emoji("⚠️ ", "!");

/// Wrench emoji for the tool report header
pub const WRENCH: Emoji = Emoji("🔧", "#");

/// Light bulb emoji for hints
pub const BULB: Emoji = Emoji("💡", "-");

/// Render an emoji, or its plain fallback when `NO_EMOJI` is set
///
/// `--no-emoji` sets `NO_EMOJI` before anything is printed.
pub fn emoji(emoji: Emoji<'_, '_>) -> String {
    if std::env::var_os("NO_EMOJI").is_some() {
        emoji.1.to_string()
    } else {
        emoji.to_string()
    }
}

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use uniminify::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// One-line size change, e.g. `2.00 KB -> 1.00 KB (-50.0%)`
pub fn format_change(metrics: &SizeMetrics) -> String {
    let change = match metrics.reduction_percent() {
        p if p == 0.0 => 0.0,
        p => -p,
    };
    format!(
        "{} -> {} ({change:+.1}%)",
        format_bytes(metrics.before_bytes),
        format_bytes(metrics.after_bytes),
    )
}
