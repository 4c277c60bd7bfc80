//! CLI Exit Code Registry
//!
//! Single source of truth for all exit codes. They are part of the shell
//! contract — cron jobs and CI steps branch on them.
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success, store fully in sync                        |
//! | 1    | General error (unspecified)                         |
//! | 2    | CLI usage error (bad args, unreadable config)       |
//! | 3    | Differences remain (store not in sync after the run)|
//! | 4    | Attention needed (unresolved / ambiguous / missing) |
//! | 5    | Workbook parse error                                |
//! | 6    | Invalid config                                      |
//! | 7    | Store (SQLite) error                                |

/// Success - store fully in sync with the spreadsheet.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure. Prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable config file.
pub const EXIT_USAGE: u8 = 2;

/// Differences found. `check`: corrections are needed; `fix`: the store is
/// still out of sync after applying (or would change under --dry-run).
pub const EXIT_DIFFS: u8 = 3;

/// Rows needing manual review: unresolved answers, ambiguous pairings,
/// questions missing from the store, questions without options.
pub const EXIT_ATTENTION: u8 = 4;

/// Workbook could not be read or parsed (bad file, missing sheet/column).
pub const EXIT_PARSE: u8 = 5;

/// Config failed to parse or validate.
pub const EXIT_CONFIG: u8 = 6;

/// SQLite open/query/update failure.
pub const EXIT_STORE: u8 = 7;
