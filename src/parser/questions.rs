use std::sync::LazyLock;

use regex::Regex;

use super::normalize::collapse_ws;

/// Start of a question: "<digits>. " at the beginning of a line.
static BLOCK_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s").unwrap());
/// Printed number and stem, up to the first option marker.
static STEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\d+)\.\s+(.*?)\s+[A-D][.)]\s+").unwrap());
static OPTION_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-D])[.)]\s+").unwrap());
static OPTION_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+[A-D][.)]\s").unwrap());
/// Page number the PDF text layer glues onto the last option of a page.
static TRAILING_PAGE_NO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\d{1,3}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock<'a> {
    pub ordinal: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuestion {
    pub ordinal: usize,
    /// Number as printed in the document, without leading zeros.
    pub printed_number: String,
    pub stem: String,
    pub options: [String; 4],
}

/// Split the question section at every line opening with "<digits>. ".
/// Text before the first marker is dropped, as are blocks that trim to nothing.
pub fn split_blocks(section: &str) -> Vec<QuestionBlock<'_>> {
    let starts: Vec<usize> = BLOCK_START_RE.find_iter(section).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(section.len());
            section[start..end].trim()
        })
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(ordinal, text)| QuestionBlock { ordinal, text })
        .collect()
}

/// Parse one block. `None` when the stem pattern does not match; such blocks
/// are dropped by the caller.
pub fn parse_block(block: &QuestionBlock) -> Option<ParsedQuestion> {
    let caps = STEM_RE.captures(block.text)?;
    let printed_number = canonical_number(&caps[1]);
    let stem = collapse_ws(&caps[2]);

    Some(ParsedQuestion {
        ordinal: block.ordinal,
        printed_number,
        stem,
        options: parse_options(block.text),
    })
}

/// Collect "<letter>. <text>" options. A letter seen twice keeps its last text.
fn parse_options(text: &str) -> [String; 4] {
    let mut options: [String; 4] = Default::default();
    let mut pos = 0;

    while let Some(caps) = OPTION_START_RE.captures_at(text, pos) {
        let Some(marker) = caps.get(0) else { break };
        let body_start = marker.end();
        let body_end = OPTION_END_RE
            .find_at(text, body_start)
            .map(|m| m.start())
            .unwrap_or(text.len());

        // the capture is a single byte in A..=D
        let slot = usize::from(caps[1].as_bytes()[0] - b'A');
        options[slot] = clean_option(&text[body_start..body_end]);
        pos = body_end;
    }

    options
}

fn clean_option(raw: &str) -> String {
    let collapsed = collapse_ws(raw);
    let trimmed = collapsed.trim_end_matches([' ', ';', '.']);
    TRAILING_PAGE_NO_RE.replace(trimmed, "").into_owned()
}

fn canonical_number(digits: &str) -> String {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}
