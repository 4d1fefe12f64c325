use std::sync::LazyLock;

use regex::Regex;

/// Heading printed above the answer-key table ("Numer pytania ... z zestawu").
static ANSWER_KEY_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Numer\s+pytania.*?z\s+zestawu").unwrap());

/// Header-less answer key: six or more "<n> <letter>" pairs starting a line.
static ANSWER_PAIRS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\n)\s*\d+\s+[A-D](?:\s+\d+\s+[A-D]){5,}").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMethod {
    Header,
    PairRun,
    NotFound,
}

#[derive(Debug, Clone)]
pub struct Split<'a> {
    /// Byte offset where the answer key begins (text length when absent).
    pub ak_start: usize,
    pub method: SplitMethod,
    pub questions: &'a str,
    pub answer_key: &'a str,
}

/// Locate the answer-key boundary in normalized text.
pub fn split_sections(text: &str) -> Split<'_> {
    let (ak_start, method) = if let Some(m) = ANSWER_KEY_HEADER_RE.find(text) {
        (m.start(), SplitMethod::Header)
    } else if let Some(m) = ANSWER_PAIRS_RE.find(text) {
        (m.start(), SplitMethod::PairRun)
    } else {
        (text.len(), SplitMethod::NotFound)
    };

    Split {
        ak_start,
        method,
        questions: text[..ak_start].trim(),
        answer_key: text[ak_start..].trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_phrase_wins() {
        let text = "1. Q? A. x B. y\nNumer pytania z zestawu\n1 A";
        let split = split_sections(text);
        assert_eq!(split.method, SplitMethod::Header);
        assert_eq!(split.ak_start, text.find("Numer").unwrap());
        assert_eq!(split.questions, "1. Q? A. x B. y");
        assert_eq!(split.answer_key, "Numer pytania z zestawu\n1 A");
    }

    #[test]
    fn header_phrase_case_insensitive_across_lines() {
        let text = "1. Q? A. x\nNUMER PYTANIA\nw kolejności\nZ ZESTAWU\n1 B";
        let split = split_sections(text);
        assert_eq!(split.method, SplitMethod::Header);
        assert_eq!(split.ak_start, text.find("NUMER").unwrap());
    }

    #[test]
    fn header_takes_first_occurrence() {
        let text = "intro\nnumer pytania z zestawu\nmore\nNumer pytania z zestawu\n1 A";
        assert_eq!(split_sections(text).ak_start, 6);
    }

    #[test]
    fn pair_run_fallback() {
        let text = "1. Q? A. x B. y\n1 A 2 B 3 C 4 D 5 A 6 B\n";
        let split = split_sections(text);
        assert_eq!(split.method, SplitMethod::PairRun);
        assert_eq!(split.questions, "1. Q? A. x B. y");
        assert_eq!(split.answer_key, "1 A 2 B 3 C 4 D 5 A 6 B");
    }

    #[test]
    fn pair_run_after_leading_spaces() {
        let text = "1. Q? A. x\n   1 A 2 B 3 C 4 D 5 A 6 B";
        let split = split_sections(text);
        assert_eq!(split.method, SplitMethod::PairRun);
        assert_eq!(split.ak_start, text.find('\n').unwrap());
        assert_eq!(split.answer_key, "1 A 2 B 3 C 4 D 5 A 6 B");
    }

    #[test]
    fn pair_run_must_start_a_line() {
        let text = "1. Q? A. x\nOdp: 1 A 2 B 3 C 4 D 5 A 6 B";
        let split = split_sections(text);
        assert_eq!(split.method, SplitMethod::NotFound);
        assert_eq!(split.questions, text);
    }

    #[test]
    fn five_pairs_are_not_an_answer_key() {
        let text = "1. Q? A. x\n1 A 2 B 3 C 4 D 5 A";
        let split = split_sections(text);
        assert_eq!(split.method, SplitMethod::NotFound);
        assert_eq!(split.ak_start, text.len());
        assert_eq!(split.answer_key, "");
    }

    #[test]
    fn empty_text() {
        let split = split_sections("");
        assert_eq!(split.ak_start, 0);
        assert!(split.questions.is_empty());
        assert!(split.answer_key.is_empty());
    }
}
