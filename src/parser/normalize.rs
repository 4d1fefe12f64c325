use std::sync::LazyLock;

use regex::Regex;

static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\x0C\x0B]+").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());
static WS_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Non-breaking, narrow no-break and figure spaces as emitted by PDF text layers.
const EXOTIC_SPACES: [char; 3] = ['\u{00A0}', '\u{202F}', '\u{2007}'];

/// Canonicalize raw page text: CR → LF, exotic spaces → ' ', horizontal
/// whitespace runs → ' ', blank lines removed.
pub fn normalize(raw: &str) -> String {
    let s = raw.replace('\r', "\n").replace(EXOTIC_SPACES, " ");
    let s = HSPACE_RE.replace_all(&s, " ");
    BLANK_LINES_RE.replace_all(&s, "\n").into_owned()
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_ws(s: &str) -> String {
    WS_RUN_RE.replace_all(s, " ").trim().to_string()
}
