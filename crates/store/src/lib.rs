//! `quizkey-store` — SQLite access to the quiz app's answer-key tables.
//!
//! Loads questions, MCQ options, and fill-in-the-blank answers into the
//! engine's input shapes, and applies correction plans in one transaction.

use std::fmt;
use std::path::Path;

use rusqlite::{params, Connection, OpenFlags};

use quizkey_recon::model::{Correction, StoredFillAnswer, StoredOption, StoredQuestion};

/// Fixture DDL matching the quiz app's schema. Production databases already
/// carry these tables; this exists for tests and local scratch copies.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY,
    question_text TEXT NOT NULL,
    question_type_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS mcq_options (
    id INTEGER PRIMARY KEY,
    question_id INTEGER NOT NULL REFERENCES questions(id),
    option_order INTEGER NOT NULL,
    option_text TEXT NOT NULL,
    is_correct INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS fill_blanks_answers (
    id INTEGER PRIMARY KEY,
    question_id INTEGER NOT NULL REFERENCES questions(id),
    correct_answer TEXT NOT NULL
);
"#;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// An update targeted a row that no longer exists; the transaction is
    /// rolled back.
    MissingRow { table: &'static str, id: i64 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "sqlite error: {e}"),
            Self::MissingRow { table, id } => {
                write!(f, "no row with id {id} in {table}; plan is stale")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            Self::MissingRow { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open an existing database. The CREATE flag is withheld so a mistyped
    /// path fails here instead of leaving an empty database file behind.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let flags = OpenFlags::default().difference(OpenFlags::SQLITE_OPEN_CREATE);
        Ok(Self { conn: Connection::open_with_flags(path, flags)? })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Load all MCQ questions of the given type, options ordered by
    /// `option_order`. Positions are re-derived 0-based from sort order, so
    /// databases populated with 0- or 1-based `option_order` load the same
    /// way and labels are always 'A' + position.
    pub fn load_mcq_questions(&self, type_id: i64) -> Result<Vec<StoredQuestion>, StoreError> {
        let mut q_stmt = self.conn.prepare(
            "SELECT id, question_text FROM questions
             WHERE question_type_id = ?1 ORDER BY id",
        )?;
        let mut o_stmt = self.conn.prepare(
            "SELECT id, option_text, is_correct FROM mcq_options
             WHERE question_id = ?1 ORDER BY option_order, id",
        )?;

        let questions = q_stmt
            .query_map(params![type_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(questions.len());
        for (id, text) in questions {
            let options = o_stmt
                .query_map(params![id], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .enumerate()
                .map(|(position, (opt_id, opt_text, is_correct))| StoredOption {
                    id: opt_id,
                    position,
                    text: opt_text,
                    is_correct,
                })
                .collect();

            out.push(StoredQuestion { id, text, options });
        }

        Ok(out)
    }

    /// Load all fill-in-the-blank answers joined with their question text.
    pub fn load_fill_answers(&self, type_id: i64) -> Result<Vec<StoredFillAnswer>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.question_id, q.question_text, a.correct_answer
             FROM fill_blanks_answers a
             JOIN questions q ON q.id = a.question_id
             WHERE q.question_type_id = ?1
             ORDER BY a.id",
        )?;

        let answers = stmt
            .query_map(params![type_id], |row| {
                Ok(StoredFillAnswer {
                    id: row.get(0)?,
                    question_id: row.get(1)?,
                    question: row.get(2)?,
                    answer: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(answers)
    }

    /// Apply a correction plan in one transaction. MCQ corrections clear
    /// every flag for the question, then set the matched option's flag;
    /// fill corrections rewrite the stored answer text. Re-applying the
    /// same plan changes nothing.
    pub fn apply(&mut self, corrections: &[Correction]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;

        for correction in corrections {
            match correction {
                Correction::SetCorrectOption { question_id, option_id, .. } => {
                    tx.execute(
                        "UPDATE mcq_options SET is_correct = 0 WHERE question_id = ?1",
                        params![question_id],
                    )?;
                    let updated = tx.execute(
                        "UPDATE mcq_options SET is_correct = 1 WHERE id = ?1",
                        params![option_id],
                    )?;
                    if updated == 0 {
                        return Err(StoreError::MissingRow { table: "mcq_options", id: *option_id });
                    }
                }
                Correction::RewriteFillAnswer { answer_id, answer, .. } => {
                    let updated = tx.execute(
                        "UPDATE fill_blanks_answers SET correct_answer = ?1 WHERE id = ?2",
                        params![answer, answer_id],
                    )?;
                    if updated == 0 {
                        return Err(StoreError::MissingRow {
                            table: "fill_blanks_answers",
                            id: *answer_id,
                        });
                    }
                }
            }
        }

        tx.commit()?;
        Ok(corrections.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use quizkey_recon::model::OptionLabel;

    fn fixture() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.init_schema().unwrap();
        store
            .conn
            .execute_batch(
                r#"
                INSERT INTO questions VALUES (1, 'Independence year?', 1);
                INSERT INTO questions VALUES (2, 'First governor ____', 2);

                -- option_order is 1-based here, as in the production dump
                INSERT INTO mcq_options VALUES (10, 1, 1, '1965', 1);
                INSERT INTO mcq_options VALUES (11, 1, 2, '1968', 0);
                INSERT INTO mcq_options VALUES (12, 1, 3, '1970', 0);
                INSERT INTO mcq_options VALUES (13, 1, 4, '1972', 0);

                INSERT INTO fill_blanks_answers VALUES (20, 2, 'Denis de Nyon');
                "#,
            )
            .unwrap();
        store
    }

    #[test]
    fn open_rejects_missing_database_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.db");
        assert!(Store::open(&path).is_err());
        assert!(!path.exists(), "open must not create a database at a bad path");
    }

    #[test]
    fn open_reads_an_existing_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(SCHEMA).unwrap();
            conn.execute("INSERT INTO questions VALUES (1, 'Q?', 1)", []).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.load_mcq_questions(1).unwrap().len(), 1);
    }

    #[test]
    fn loads_questions_with_zero_based_positions() {
        let store = fixture();
        let questions = store.load_mcq_questions(1).unwrap();
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.id, 1);
        assert_eq!(q.options.len(), 4);
        // 1-based option_order in the data, 0-based positions out
        assert_eq!(q.options[0].position, 0);
        assert_eq!(q.options[0].text, "1965");
        assert!(q.options[0].is_correct);
        assert_eq!(q.options[3].position, 3);
        assert_eq!(q.options[3].text, "1972");
    }

    #[test]
    fn zero_based_option_order_loads_identically() {
        let store = Store::open_in_memory().unwrap();
        store.init_schema().unwrap();
        store
            .conn
            .execute_batch(
                r#"
                INSERT INTO questions VALUES (1, 'Q?', 1);
                INSERT INTO mcq_options VALUES (10, 1, 0, 'a', 0);
                INSERT INTO mcq_options VALUES (11, 1, 1, 'b', 1);
                "#,
            )
            .unwrap();
        let q = &store.load_mcq_questions(1).unwrap()[0];
        assert_eq!(q.options[0].position, 0);
        assert_eq!(q.options[0].text, "a");
        assert_eq!(q.options[1].text, "b");
    }

    #[test]
    fn loads_fill_answers_for_their_type_only() {
        let store = fixture();
        let answers = store.load_fill_answers(2).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].question, "First governor ____");
        assert_eq!(answers[0].answer, "Denis de Nyon");
        assert!(store.load_fill_answers(1).unwrap().is_empty());
    }

    #[test]
    fn apply_clears_then_sets_flags() {
        let mut store = fixture();
        let applied = store
            .apply(&[Correction::SetCorrectOption {
                question_id: 1,
                option_id: 11,
                label: OptionLabel::B,
            }])
            .unwrap();
        assert_eq!(applied, 1);

        let q = &store.load_mcq_questions(1).unwrap()[0];
        let flagged: Vec<i64> = q.options.iter().filter(|o| o.is_correct).map(|o| o.id).collect();
        assert_eq!(flagged, vec![11]);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut store = fixture();
        let plan = vec![Correction::SetCorrectOption {
            question_id: 1,
            option_id: 12,
            label: OptionLabel::C,
        }];
        store.apply(&plan).unwrap();
        let after_first = store.load_mcq_questions(1).unwrap();
        store.apply(&plan).unwrap();
        let after_second = store.load_mcq_questions(1).unwrap();

        let flags = |qs: &[quizkey_recon::model::StoredQuestion]| {
            qs[0].options.iter().map(|o| o.is_correct).collect::<Vec<_>>()
        };
        assert_eq!(flags(&after_first), flags(&after_second));
        assert_eq!(flags(&after_first), vec![false, false, true, false]);
    }

    #[test]
    fn apply_rewrites_fill_answer() {
        let mut store = fixture();
        store
            .apply(&[Correction::RewriteFillAnswer {
                answer_id: 20,
                question_id: 2,
                answer: "Denis de Nyon (1722)".into(),
            }])
            .unwrap();
        let answers = store.load_fill_answers(2).unwrap();
        assert_eq!(answers[0].answer, "Denis de Nyon (1722)");
    }

    #[test]
    fn stale_plan_rolls_back() {
        let mut store = fixture();
        let err = store
            .apply(&[
                Correction::SetCorrectOption { question_id: 1, option_id: 11, label: OptionLabel::B },
                Correction::SetCorrectOption { question_id: 1, option_id: 999, label: OptionLabel::D },
            ])
            .unwrap_err();
        assert!(err.to_string().contains("999"));

        // First correction must not have stuck.
        let q = &store.load_mcq_questions(1).unwrap()[0];
        let flagged: Vec<i64> = q.options.iter().filter(|o| o.is_correct).map(|o| o.id).collect();
        assert_eq!(flagged, vec![10]);
    }
}
