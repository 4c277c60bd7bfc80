use serde::Deserialize;

use crate::error::ReconError;
use crate::model::MAX_OPTIONS;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// The single externally supplied configuration for a reconciliation run.
/// Nothing (paths, sheet names, type ids) is ever embedded as a literal in
/// the driver code.
#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub workbook: WorkbookConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub pairing: PairingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Workbook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WorkbookConfig {
    /// Spreadsheet export path (xlsx, xls, ods, or csv).
    pub file: String,
    #[serde(default = "default_mcq_sheet")]
    pub mcq_sheet: String,
    /// Fill-in-the-blank sheet; omit to skip fill reconciliation.
    #[serde(default)]
    pub fill_sheet: Option<String>,
    #[serde(default)]
    pub columns: ColumnMapping,
}

fn default_mcq_sheet() -> String {
    "MCQ".into()
}

/// Header names in the export. Defaults match the quiz app's exporter.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_question_col")]
    pub question: String,
    /// Option columns in A–D order; between 1 and 4 entries.
    #[serde(default = "default_option_cols")]
    pub options: Vec<String>,
    #[serde(default = "default_correct_col")]
    pub correct_answer: String,
    /// Answer column on the fill sheet.
    #[serde(default = "default_answer_col")]
    pub answer: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            question: default_question_col(),
            options: default_option_cols(),
            correct_answer: default_correct_col(),
            answer: default_answer_col(),
        }
    }
}

fn default_question_col() -> String {
    "question".into()
}

fn default_option_cols() -> Vec<String> {
    vec!["optionA".into(), "optionB".into(), "optionC".into(), "optionD".into()]
}

fn default_correct_col() -> String {
    "correctAnswer".into()
}

fn default_answer_col() -> String {
    "answer".into()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path.
    pub database: String,
    #[serde(default = "default_mcq_type")]
    pub mcq_type_id: i64,
    #[serde(default = "default_fill_type")]
    pub fill_type_id: i64,
}

fn default_mcq_type() -> i64 {
    1
}

fn default_fill_type() -> i64 {
    2
}

// ---------------------------------------------------------------------------
// Pairing + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PairingConfig {
    /// Normalized-prefix length for the question-identity fallback match.
    #[serde(default = "default_prefix_len")]
    pub question_prefix_len: usize,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self { question_prefix_len: default_prefix_len() }
    }
}

fn default_prefix_len() -> usize {
    40
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.workbook.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("workbook.file must not be empty".into()));
        }

        if self.store.database.trim().is_empty() {
            return Err(ReconError::ConfigValidation("store.database must not be empty".into()));
        }

        let option_count = self.workbook.columns.options.len();
        if option_count == 0 || option_count > MAX_OPTIONS {
            return Err(ReconError::ConfigValidation(format!(
                "columns.options must list 1 to {MAX_OPTIONS} columns, got {option_count}"
            )));
        }

        if self.pairing.question_prefix_len == 0 {
            return Err(ReconError::ConfigValidation(
                "pairing.question_prefix_len must be at least 1".into(),
            ));
        }

        if self.store.mcq_type_id == self.store.fill_type_id {
            return Err(ReconError::ConfigValidation(format!(
                "mcq_type_id and fill_type_id must differ, both are {}",
                self.store.mcq_type_id
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
