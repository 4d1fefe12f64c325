pub mod answers;
pub mod normalize;
pub mod questions;
pub mod record;
pub mod sections;
pub mod topics;

use tracing::debug;

use record::QuestionRecord;
use topics::TopicClassifier;

/// Everything pulled out of one exam paper.
#[derive(Debug, Clone, Default)]
pub struct ExtractedExam {
    pub records: Vec<QuestionRecord>,
    pub blocks_found: usize,
    pub blocks_skipped: usize,
    pub answer_key_entries: usize,
    pub exam_date: Option<String>,
}

/// Pages → normalized text → (questions, answer key) → records.
pub fn process_document(pages: &[String]) -> ExtractedExam {
    process_text(&pages.join("\n"))
}

pub fn process_text(raw: &str) -> ExtractedExam {
    process_text_with(raw, &TopicClassifier::default())
}

pub fn process_text_with(raw: &str, classifier: &TopicClassifier) -> ExtractedExam {
    let text = normalize::normalize(raw);
    let exam_date = record::find_exam_date(&text);
    let split = sections::split_sections(&text);
    debug!(method = ?split.method, ak_start = split.ak_start, "answer key located");

    let blocks = questions::split_blocks(split.questions);
    let answers = answers::parse_answer_key(split.answer_key);

    let mut skipped = 0;
    let records = blocks
        .iter()
        .filter_map(|block| {
            let parsed = questions::parse_block(block);
            if parsed.is_none() {
                skipped += 1;
                debug!(ordinal = block.ordinal, "block has no option marker, skipping");
            }
            parsed
        })
        .map(|q| record::assemble(q, &answers, classifier, exam_date.as_deref()))
        .collect();

    ExtractedExam {
        records,
        blocks_found: blocks.len(),
        blocks_skipped: skipped,
        answer_key_entries: answers.len(),
        exam_date,
    }
}
