//! `quizkey-recon` — answer-key reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded spreadsheet rows and store rows,
//! returns classified outcomes plus a correction plan. No IO, no SQL, no CLI
//! dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod matcher;
pub mod model;
pub mod pairing;
pub mod summary;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use matcher::{match_answer, match_answer_explain};
pub use model::{Candidate, OptionLabel, ReconInput, ReconResult};
