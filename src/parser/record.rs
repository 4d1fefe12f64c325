use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::answers::AnswerKey;
use super::questions::ParsedQuestion;
use super::topics::TopicClassifier;

static EXAM_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{4}").unwrap());

/// One stored question, shaped like the `questions` collection documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub question: String,
    #[serde(rename = "option_A")]
    pub option_a: String,
    #[serde(rename = "option_B")]
    pub option_b: String,
    #[serde(rename = "option_C")]
    pub option_c: String,
    #[serde(rename = "option_D")]
    pub option_d: String,
    pub correct_answer: String,
    pub main_topic: Vec<String>,
    pub sub_topic: Vec<String>,
    pub exam_date: Option<String>,
}

/// First "dd.mm.yyyy" anywhere in the document.
pub fn find_exam_date(text: &str) -> Option<String> {
    EXAM_DATE_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn assemble(
    question: ParsedQuestion,
    answers: &AnswerKey,
    classifier: &TopicClassifier,
    exam_date: Option<&str>,
) -> QuestionRecord {
    let topics = classifier.classify(&question.stem);
    let correct_answer = answers
        .get(&question.printed_number)
        .map(|c| c.to_string())
        .unwrap_or_default();
    let [option_a, option_b, option_c, option_d] = question.options;

    QuestionRecord {
        id: question.ordinal as i64,
        question: question.stem,
        option_a,
        option_b,
        option_c,
        option_d,
        correct_answer,
        main_topic: topics.main_topic,
        sub_topic: topics.sub_topic,
        exam_date: exam_date.map(str::to_string),
    }
}
