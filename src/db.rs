use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, ToSql};
use serde::Serialize;

use crate::parser::record::QuestionRecord;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS questions (
            pk             INTEGER PRIMARY KEY,
            id             INTEGER NOT NULL,
            question       TEXT NOT NULL,
            option_a       TEXT NOT NULL DEFAULT '',
            option_b       TEXT NOT NULL DEFAULT '',
            option_c       TEXT NOT NULL DEFAULT '',
            option_d       TEXT NOT NULL DEFAULT '',
            correct_answer TEXT NOT NULL DEFAULT '',
            main_topic     TEXT NOT NULL DEFAULT '[]',
            sub_topic      TEXT NOT NULL DEFAULT '[]',
            exam_date      TEXT,
            source_file    TEXT NOT NULL,
            inserted_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_questions_exam_date ON questions(exam_date);
        CREATE INDEX IF NOT EXISTS idx_questions_source ON questions(source_file);
        ",
    )?;
    Ok(())
}

// ── Storage ──

/// Insert one document's questions in a single transaction.
/// An empty batch writes nothing.
pub fn insert_questions(
    conn: &Connection,
    source_file: &str,
    records: &[QuestionRecord],
) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO questions
             (id, question, option_a, option_b, option_c, option_d, correct_answer,
              main_topic, sub_topic, exam_date, source_file)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        for r in records {
            count += stmt.execute(rusqlite::params![
                r.id,
                r.question,
                r.option_a,
                r.option_b,
                r.option_c,
                r.option_d,
                r.correct_answer,
                serde_json::to_string(&r.main_topic)?,
                serde_json::to_string(&r.sub_topic)?,
                r.exam_date,
                source_file,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Queries ──

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub main_topic: Option<String>,
    pub sub_topic: Option<String>,
    pub exam_date: Option<String>,
}

impl QuestionFilter {
    fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(m) = &self.main_topic {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(main_topic) WHERE value = ?{})",
                params.len() + 1
            ));
            params.push(Box::new(m.clone()));
        }
        if let Some(s) = &self.sub_topic {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(sub_topic) WHERE value = ?{})",
                params.len() + 1
            ));
            params.push(Box::new(s.clone()));
        }
        if let Some(d) = &self.exam_date {
            conditions.push(format!("exam_date = ?{}", params.len() + 1));
            params.push(Box::new(d.clone()));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        (clause, params)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredQuestion {
    #[serde(rename = "_id")]
    pub pk: i64,
    #[serde(flatten)]
    pub record: QuestionRecord,
    pub source_file: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionPage {
    pub questions: Vec<StoredQuestion>,
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
    pub has_more: bool,
    pub random: bool,
}

/// Filtered questions, either paginated in insertion order or a random sample.
pub fn fetch_questions(
    conn: &Connection,
    filter: &QuestionFilter,
    n: usize,
    skip: usize,
    random: bool,
) -> Result<QuestionPage> {
    if n == 0 {
        bail!("n must be greater than 0");
    }
    let total = count_questions(conn, filter)?;
    if total == 0 {
        bail!("No questions found for given filters");
    }
    let limit = n.min(total);
    let skip = if random { 0 } else { skip };

    let (where_clause, params) = filter.where_clause();
    let order = if random {
        format!(" ORDER BY RANDOM() LIMIT {}", limit)
    } else {
        format!(" ORDER BY pk LIMIT {} OFFSET {}", limit, skip)
    };
    let sql = format!(
        "SELECT pk, id, question, option_a, option_b, option_c, option_d, correct_answer,
                main_topic, sub_topic, exam_date, source_file
         FROM questions{}{}",
        where_clause, order
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let questions = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(StoredQuestion {
                pk: row.get(0)?,
                record: QuestionRecord {
                    id: row.get(1)?,
                    question: row.get(2)?,
                    option_a: row.get(3)?,
                    option_b: row.get(4)?,
                    option_c: row.get(5)?,
                    option_d: row.get(6)?,
                    correct_answer: row.get(7)?,
                    main_topic: json_list(row, 8)?,
                    sub_topic: json_list(row, 9)?,
                    exam_date: row.get(10)?,
                },
                source_file: row.get(11)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuestionPage {
        questions,
        total,
        skip,
        limit,
        has_more: !random && skip + limit < total,
        random,
    })
}

pub fn count_questions(conn: &Connection, filter: &QuestionFilter) -> Result<usize> {
    let (where_clause, params) = filter.where_clause();
    let sql = format!("SELECT COUNT(*) FROM questions{}", where_clause);
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let total: usize = conn.query_row(&sql, param_refs.as_slice(), |r| r.get(0))?;
    Ok(total)
}

/// Main topic → distinct subtopics seen under it.
pub fn fetch_topics(conn: &Connection) -> Result<BTreeMap<String, Vec<String>>> {
    let mut stmt = conn.prepare("SELECT main_topic, sub_topic FROM questions")?;
    let rows = stmt
        .query_map([], |row| Ok((json_list(row, 0)?, json_list(row, 1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut topics: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (main, subs) in rows {
        let main = main.into_iter().next().unwrap_or_else(|| "Unknown".to_string());
        topics.entry(main).or_default().extend(subs);
    }
    Ok(topics
        .into_iter()
        .map(|(k, v)| (k, v.into_iter().collect()))
        .collect())
}

/// Distinct exam dates in chronological order; unparsable ones go last.
pub fn fetch_exam_dates(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT exam_date FROM questions WHERE exam_date IS NOT NULL")?;
    let mut dates = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    dates.sort_by_cached_key(|d| {
        let parsed = NaiveDate::parse_from_str(d, "%d.%m.%Y").ok();
        (parsed.is_none(), parsed, d.clone())
    });
    Ok(dates)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtopicCount {
    #[serde(rename = "_id")]
    pub sub_topic: String,
    pub count: usize,
}

pub fn fetch_subtopic_counts(conn: &Connection) -> Result<Vec<SubtopicCount>> {
    let mut stmt = conn.prepare(
        "SELECT s.value, COUNT(*) AS n
         FROM questions q, json_each(q.sub_topic) s
         GROUP BY s.value
         ORDER BY n DESC, s.value",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(SubtopicCount {
                sub_topic: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn json_list(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub documents: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub undated: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM questions", [], |r| r.get(0))?;
    let documents: usize = conn.query_row(
        "SELECT COUNT(DISTINCT source_file) FROM questions",
        [],
        |r| r.get(0),
    )?;
    let answered: usize = conn.query_row(
        "SELECT COUNT(*) FROM questions WHERE correct_answer != ''",
        [],
        |r| r.get(0),
    )?;
    let undated: usize = conn.query_row(
        "SELECT COUNT(*) FROM questions WHERE exam_date IS NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        total,
        documents,
        answered,
        unanswered: total - answered,
        undated,
    })
}

// ── Tests ──
