//! Small pure text helpers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate `raw` so it occupies at most `max_width` terminal columns,
/// ending with `…` when anything was cut.
///
/// Width is measured in display columns, so wide CJK characters and emoji
/// count double.
#[must_use]
pub fn truncate_to_width(raw: &str, max_width: usize) -> String {
    if raw.width() <= max_width {
        return raw.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in raw.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
