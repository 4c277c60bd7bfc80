use std::collections::HashMap;

use serde::Serialize;

/// A multiple-choice question never carries more than four options.
pub const MAX_OPTIONS: usize = 4;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Stable option label, assigned by 0-based position: 'A' + index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::A),
            1 => Some(Self::B),
            2 => Some(Self::C),
            3 => Some(Self::D),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl std::fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ---------------------------------------------------------------------------
// Matcher input/output
// ---------------------------------------------------------------------------

/// One labeled option text presented to the matcher.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub label: OptionLabel,
    pub text: String,
}

/// Which tier of the matching ladder produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Letter,
    Prefix,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Letter => write!(f, "letter"),
            Self::Prefix => write!(f, "prefix"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerMatch {
    pub label: OptionLabel,
    pub tier: MatchTier,
}

// ---------------------------------------------------------------------------
// Input rows
// ---------------------------------------------------------------------------

/// One MCQ row from the spreadsheet export. `row` is the 1-based worksheet
/// row number (data starts at row 2, below the header).
#[derive(Debug, Clone)]
pub struct SheetQuestion {
    pub row: u32,
    pub question: String,
    /// Option texts in A–D order; trailing blanks dropped.
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// One fill-in-the-blank row from the spreadsheet export.
#[derive(Debug, Clone)]
pub struct SheetFillRow {
    pub row: u32,
    pub question: String,
    pub answer: String,
}

/// One option row from `mcq_options`. `position` is 0-based, re-derived
/// from `option_order` sort order by the store layer.
#[derive(Debug, Clone)]
pub struct StoredOption {
    pub id: i64,
    pub position: usize,
    pub text: String,
    pub is_correct: bool,
}

/// One MCQ question from the store, options ordered by position.
#[derive(Debug, Clone)]
pub struct StoredQuestion {
    pub id: i64,
    pub text: String,
    pub options: Vec<StoredOption>,
}

/// One row from `fill_blanks_answers`, joined with its question text.
#[derive(Debug, Clone)]
pub struct StoredFillAnswer {
    pub id: i64,
    pub question_id: i64,
    pub question: String,
    pub answer: String,
}

/// Pre-loaded records for one engine run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub sheet_mcq: Vec<SheetQuestion>,
    pub sheet_fill: Vec<SheetFillRow>,
    pub store_mcq: Vec<StoredQuestion>,
    pub store_fill: Vec<StoredFillAnswer>,
}

// ---------------------------------------------------------------------------
// Corrections
// ---------------------------------------------------------------------------

/// A planned store mutation. Applying the same plan twice is a no-op in
/// effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Correction {
    /// Clear every `is_correct` flag for the question, then set the matched
    /// option's flag.
    SetCorrectOption {
        question_id: i64,
        option_id: i64,
        label: OptionLabel,
    },
    /// Rewrite the stored fill-in-the-blank answer text.
    RewriteFillAnswer {
        answer_id: i64,
        question_id: i64,
        answer: String,
    },
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconBucket {
    /// Store already agrees with the spreadsheet.
    InSync,
    /// A correction was planned.
    NeedsFix,
    /// Matcher found no equivalent option / usable answer; manual review.
    Unresolved,
    /// No stored question paired with the sheet row.
    NotInStore,
    /// More than one stored question paired with the sheet row.
    Ambiguous,
    /// Paired MCQ question has no option rows at all.
    MissingOptions,
}

impl std::fmt::Display for ReconBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InSync => write!(f, "in_sync"),
            Self::NeedsFix => write!(f, "needs_fix"),
            Self::Unresolved => write!(f, "unresolved"),
            Self::NotInStore => write!(f, "not_in_store"),
            Self::Ambiguous => write!(f, "ambiguous"),
            Self::MissingOptions => write!(f, "missing_options"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Mcq,
    Fill,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionOutcome {
    pub bucket: ReconBucket,
    pub kind: RowKind,
    pub sheet_row: u32,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<AnswerMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    pub in_sync: usize,
    pub needs_fix: usize,
    pub unresolved: usize,
    pub not_in_store: usize,
    pub ambiguous: usize,
    pub missing_options: usize,
    pub bucket_counts: HashMap<String, usize>,
}

impl ReconSummary {
    /// True when every row reconciled cleanly with nothing left to do.
    pub fn is_clean(&self) -> bool {
        self.in_sync == self.total_rows
    }

    /// Rows needing manual review (never silently defaulted).
    pub fn attention_needed(&self) -> usize {
        self.unresolved + self.not_in_store + self.ambiguous + self.missing_options
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub outcomes: Vec<QuestionOutcome>,
    pub corrections: Vec<Correction>,
}
