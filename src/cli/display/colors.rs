//! Confidence and review-flag coloring for CLI output.

use console::{style, StyledObject};

/// Confidence formatted to two decimals and colored by band.
///
/// Green at 0.85 and above, yellow from 0.5, red below.
pub fn colorize_confidence(confidence: f64) -> StyledObject<String> {
    let text = format!("{confidence:.2}");
    if confidence >= 0.85 {
        style(text).green().bold()
    } else if confidence >= 0.5 {
        style(text).yellow()
    } else {
        style(text).red()
    }
}

/// "review" in yellow, or "auto" dimmed.
pub fn colorize_review(requires_review: bool) -> StyledObject<&'static str> {
    if requires_review {
        style("review").yellow().bold()
    } else {
        style("auto").dim()
    }
}
