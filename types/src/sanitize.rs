//! Terminal-safe rendering of item text.
//!
//! Items come straight from user files or pipes and are drawn inside a
//! single-line card, so escape sequences and control characters must never
//! reach the terminal.

use std::borrow::Cow;
use std::iter::Peekable;

const ESC: char = '\x1b';
const BEL: char = '\x07';
/// C1 single-character CSI.
const C1_CSI: char = '\u{009b}';

/// Make item text safe to draw on one terminal line.
///
/// Strips ANSI escape sequences (CSI, OSC, DCS and two-byte forms), C0 and
/// C1 control characters and DEL. Tabs become a single space because items
/// are always rendered on one line.
///
/// Returns `Cow::Borrowed` when nothing needs to change.
///
/// ```
/// use rankwise_types::sanitize_item_text;
///
/// assert_eq!(sanitize_item_text("plain"), "plain");
/// assert_eq!(sanitize_item_text("red\x1b[31m!"), "red!");
/// assert_eq!(sanitize_item_text("a\tb"), "a b");
/// ```
#[must_use]
pub fn sanitize_item_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_control) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape(&mut chars),
            C1_CSI => skip_csi(&mut chars),
            '\t' => out.push(' '),
            c if is_control(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_control(c: char) -> bool {
    c <= '\x1f' || c == '\x7f' || ('\u{0080}'..='\u{009f}').contains(&c)
}

fn skip_escape<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    match chars.peek().copied() {
        Some('[') => {
            chars.next();
            skip_csi(chars);
        }
        Some(']' | 'P' | '^' | '_') => {
            chars.next();
            skip_string_sequence(chars);
        }
        Some('(' | ')' | '*' | '+' | '#' | ' ') => {
            chars.next();
            chars.next();
        }
        Some('7' | '8' | 'c' | 'D' | 'E' | 'H' | 'M' | 'N' | 'O' | 'Z' | '=' | '>' | '<') => {
            chars.next();
        }
        _ => {}
    }
}

/// Parameter and intermediate bytes, then one final byte.
fn skip_csi<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(&c) = chars.peek() {
        if ('\x20'..='\x3f').contains(&c) {
            chars.next();
        } else {
            if ('\x40'..='\x7e').contains(&c) {
                chars.next();
            }
            return;
        }
    }
}

/// OSC/DCS/PM/APC bodies end at BEL or ST (`ESC \`).
fn skip_string_sequence<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(c) = chars.next() {
        if c == BEL {
            return;
        }
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}
