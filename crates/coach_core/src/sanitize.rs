//! Terminal output sanitizer.
//!
//! The inference binary writes progress spinners and cursor control
//! sequences to the same stream as the answer. Everything that is not
//! printable text must be stripped before word counting or JSON
//! extraction sees it.

use once_cell::sync::Lazy;
use regex::Regex;

/// ANSI CSI sequences: colors, cursor movement, erase, etc.
static ANSI_CSI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1B\[[;\d]*[ -/]*[@-~]").unwrap());

/// Residual control sequences left after the escape byte is gone,
/// e.g. `[?25l` / `[?25h` (cursor hide/show).
static BARE_CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\?\d+[hl]").unwrap());

/// Strip terminal control sequences and non-printable characters,
/// preserving whitespace, then trim. Idempotent.
pub fn sanitize(raw: &str) -> String {
    let no_ansi = ANSI_CSI.replace_all(raw, "");
    let no_control = BARE_CONTROL.replace_all(&no_ansi, "");
    no_control
        .chars()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
