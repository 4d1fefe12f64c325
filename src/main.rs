mod db;
mod discover;
mod parser;
mod pdf;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

use parser::ExtractedExam;
use settings::Settings;

#[derive(Parser)]
#[command(name = "exam_scraper", about = "Brokerage exam question scraper and question bank")]
struct Cli {
    /// SQLite database path (overrides EXAM_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Main topic, e.g. "Prawo"
    #[arg(long)]
    main_topic: Option<String>,
    /// Subtopic, e.g. "Ustawa o Obligacjach"
    #[arg(long)]
    sub_topic: Option<String>,
    /// Exam date in dd.mm.yyyy form
    #[arg(long)]
    exam_date: Option<String>,
}

impl From<FilterArgs> for db::QuestionFilter {
    fn from(f: FilterArgs) -> Self {
        db::QuestionFilter {
            main_topic: f.main_topic,
            sub_topic: f.sub_topic,
            exam_date: f.exam_date,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract questions from every PDF under the data directory and store them
    Scrape {
        /// Input directory (overrides EXAM_DATA_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Parse only, do not write to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Parse a single PDF and print its questions as JSON
    Parse { file: PathBuf },
    /// Main topics with their subtopics
    Topics,
    /// Query stored questions
    Questions {
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of questions to return
        #[arg(short = 'n', long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
        n: u64,
        /// Questions to skip (ignored with --random)
        #[arg(long, default_value = "0")]
        skip: usize,
        /// Random sample instead of ordered pages
        #[arg(long)]
        random: bool,
    },
    /// Count stored questions matching the filters
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Distinct exam dates, oldest first
    ExamDates,
    /// Number of questions per subtopic
    SubtopicCounts,
    /// Show question bank statistics
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let db_path = cli.db.unwrap_or_else(|| settings.db_path.clone());

    let result = match cli.command {
        Commands::Scrape { dir, dry_run } => {
            let dir = dir.unwrap_or_else(|| settings.data_dir.clone());
            let files = discover::find_pdfs(&dir)?;
            if files.is_empty() {
                println!("No PDF files found under {:?}.", dir);
                return Ok(());
            }

            let conn = if dry_run {
                None
            } else {
                let conn = db::connect(&db_path)?;
                db::init_schema(&conn)?;
                Some(conn)
            };
            println!("Processing {} PDF files...", files.len());
            let counts = scrape_files(conn.as_ref(), &files)?;
            counts.print(dry_run);
            Ok(())
        }
        Commands::Parse { file } => {
            let exam = load_exam(&file)?;
            println!("{}", serde_json::to_string_pretty(&exam.records)?);
            info!(
                blocks = exam.blocks_found,
                skipped = exam.blocks_skipped,
                answers = exam.answer_key_entries,
                "Parsed {:?}",
                file
            );
            Ok(())
        }
        Commands::Topics => {
            let conn = open_db(&db_path)?;
            print_json(&db::fetch_topics(&conn)?)
        }
        Commands::Questions {
            filter,
            n,
            skip,
            random,
        } => {
            let conn = open_db(&db_path)?;
            let page = db::fetch_questions(&conn, &filter.into(), n as usize, skip, random)?;
            print_json(&page)
        }
        Commands::Count { filter } => {
            let conn = open_db(&db_path)?;
            let total = db::count_questions(&conn, &filter.into())?;
            print_json(&serde_json::json!({ "total": total }))
        }
        Commands::ExamDates => {
            let conn = open_db(&db_path)?;
            let dates = db::fetch_exam_dates(&conn)?;
            print_json(&serde_json::json!({ "exam_dates": dates }))
        }
        Commands::SubtopicCounts => {
            let conn = open_db(&db_path)?;
            let counts = db::fetch_subtopic_counts(&conn)?;
            print_json(&serde_json::json!({ "subtopic_counts": counts }))
        }
        Commands::Stats => {
            let conn = open_db(&db_path)?;
            let s = db::get_stats(&conn)?;
            println!("Questions:  {}", s.total);
            println!("Documents:  {}", s.documents);
            println!("Answered:   {}", s.answered);
            println!("Unanswered: {}", s.unanswered);
            println!("Undated:    {}", s.undated);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn open_db(path: &Path) -> Result<rusqlite::Connection> {
    let conn = db::connect(path)?;
    db::init_schema(&conn)?;
    Ok(conn)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_exam(path: &Path) -> Result<ExtractedExam> {
    let pages = pdf::extract_pages(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(parser::process_document(&pages))
}

struct ScrapeCounts {
    documents: usize,
    failed: usize,
    empty: usize,
    questions: usize,
    skipped_blocks: usize,
}

impl ScrapeCounts {
    fn print(&self, dry_run: bool) {
        let verb = if dry_run { "parsed" } else { "inserted" };
        println!(
            "{} questions {} from {} documents ({} empty, {} failed, {} blocks skipped).",
            self.questions, verb, self.documents, self.empty, self.failed, self.skipped_blocks,
        );
    }
}

/// Parse documents in parallel, then store each one as its own batch.
fn scrape_files(conn: Option<&rusqlite::Connection>, files: &[PathBuf]) -> Result<ScrapeCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let verb = if conn.is_some() { "inserted" } else { "parsed" };
    let mut counts = ScrapeCounts {
        documents: 0,
        failed: 0,
        empty: 0,
        questions: 0,
        skipped_blocks: 0,
    };

    for chunk in files.chunks(32) {
        let results: Vec<_> = chunk.par_iter().map(|path| (path, load_exam(path))).collect();

        for (path, result) in results {
            pb.inc(1);
            let exam = match result {
                Ok(exam) => exam,
                Err(e) => {
                    warn!("Skipping {:?}: {:#}", path, e);
                    counts.failed += 1;
                    continue;
                }
            };

            counts.documents += 1;
            counts.skipped_blocks += exam.blocks_skipped;
            if exam.records.is_empty() {
                counts.empty += 1;
                pb.println(format!("0 questions found in {:?}", path));
                continue;
            }

            let source = path.to_string_lossy();
            let stored = match conn {
                Some(conn) => db::insert_questions(conn, &source, &exam.records)?,
                None => exam.records.len(),
            };
            counts.questions += stored;
            pb.println(format!("{} questions {} from {:?}", stored, verb, path));
            debug!(
                file = %source,
                questions = stored,
                skipped = exam.blocks_skipped,
                exam_date = exam.exam_date.as_deref().unwrap_or("-"),
                "Document processed"
            );
        }
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
