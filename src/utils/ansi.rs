//! Helpers for text that may carry ANSI colour codes.

use regex::Regex;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

pub fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static regex"));
    re.replace_all(s, "").into_owned()
}

/// Terminal columns taken by `s` once colour codes are removed.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

/// Left-align `s` in `width` terminal columns.
pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::colors::colorize_flag;
    use ansi_term::Colour;

    #[test]
    fn strip_ansi_removes_colour_codes() {
        let painted = Colour::Green.paint("agenda_add").to_string();
        assert_eq!(strip_ansi(&painted), "agenda_add");
    }

    #[test]
    fn width_ignores_escapes_and_counts_wide_chars() {
        assert_eq!(display_width(&colorize_flag(true)), 3);
        assert_eq!(display_width("Café"), 4);
        assert_eq!(display_width("会議"), 4);
    }
}
