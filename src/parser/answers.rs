use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static ANSWER_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,3})\s*([ABCD])\b").unwrap());

/// Printed question number → correct letter.
pub type AnswerKey = HashMap<String, char>;

/// Parse "<number> <letter>" pairs. When a number repeats, the later pair wins.
pub fn parse_answer_key(section: &str) -> AnswerKey {
    ANSWER_PAIR_RE
        .captures_iter(section)
        .filter_map(|caps| {
            let letter = caps[2].chars().next()?;
            Some((caps[1].to_string(), letter))
        })
        .collect()
}
