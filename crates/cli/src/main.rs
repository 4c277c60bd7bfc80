// quizkey - inspect and repair quiz answer-key data against a spreadsheet
// export. `check` never writes; `fix` applies the planned corrections and
// re-checks afterwards.

mod exit_codes;
mod load;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{
    EXIT_ATTENTION, EXIT_CONFIG, EXIT_DIFFS, EXIT_ERROR, EXIT_PARSE, EXIT_STORE, EXIT_SUCCESS,
    EXIT_USAGE,
};
use quizkey_recon::{ReconConfig, ReconResult};

#[derive(Parser)]
#[command(name = "quizkey")]
#[command(about = "Reconcile a quiz store's answer keys with a spreadsheet export")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the store against the spreadsheet; never writes
    #[command(after_help = "\
Examples:
  quizkey check recon.toml
  quizkey check recon.toml --json
  quizkey check recon.toml --output report.json")]
    Check {
        /// Path to the recon TOML config
        config: PathBuf,

        /// Output JSON to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Apply planned corrections to the store, then re-check
    #[command(after_help = "\
Examples:
  quizkey fix recon.toml
  quizkey fix recon.toml --dry-run
  quizkey fix recon.toml --json --output after.json")]
    Fix {
        /// Path to the recon TOML config
        config: PathBuf,

        /// Plan and report corrections without touching the store
        #[arg(long)]
        dry_run: bool,

        /// Output JSON to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  quizkey validate recon.toml")]
    Validate {
        /// Path to the recon TOML config
        config: PathBuf,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self { code: EXIT_STORE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { config, json, output } => cmd_check(config, json, output),
        Commands::Fix { config, dry_run, json, output } => cmd_fix(config, dry_run, json, output),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

fn read_config(config_path: &Path) -> Result<(ReconConfig, PathBuf), CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::usage(format!("cannot read config: {e}")))?;

    let config = ReconConfig::from_toml(&config_str).map_err(|e| CliError::config(e.to_string()))?;

    // Workbook, database, and report paths resolve relative to the config.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    Ok((config, base_dir))
}

// ============================================================================
// check
// ============================================================================

fn cmd_check(config_path: PathBuf, json: bool, output: Option<PathBuf>) -> Result<(), CliError> {
    let (config, base_dir) = read_config(&config_path)?;
    let run = load::load(&config, &base_dir)?;

    let result = quizkey_recon::run(&config, &run.input);

    emit(&result, &config, &base_dir, json, output)?;
    print_summary("check", &result);

    exit_for(&result)
}

// ============================================================================
// fix
// ============================================================================

fn cmd_fix(
    config_path: PathBuf,
    dry_run: bool,
    json: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let (config, base_dir) = read_config(&config_path)?;
    let mut run = load::load(&config, &base_dir)?;

    let planned = quizkey_recon::run(&config, &run.input);

    if dry_run {
        emit(&planned, &config, &base_dir, json, output)?;
        print_summary("fix (dry run)", &planned);
        eprintln!("dry run: would apply {} correction(s)", planned.corrections.len());
        return exit_for(&planned);
    }

    let applied = run
        .store
        .apply(&planned.corrections)
        .map_err(|e| CliError::store(e.to_string()))?;
    eprintln!("applied {applied} correction(s)");

    // Verification pass: reload the store side and reconcile again. The
    // report reflects the post-fix state.
    load::refresh_store_rows(&config, &mut run)?;
    let verified = quizkey_recon::run(&config, &run.input);

    emit(&verified, &config, &base_dir, json, output)?;
    print_summary("fix (verified)", &verified);

    if verified.summary.needs_fix > 0 {
        return Err(CliError {
            code: EXIT_DIFFS,
            message: format!("{} row(s) still out of sync after fix", verified.summary.needs_fix),
            hint: None,
        });
    }
    exit_for(&verified)
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, _) = read_config(&config_path)?;

    eprintln!(
        "valid: '{}' — workbook '{}' (mcq sheet '{}'{}), store '{}'",
        config.name,
        config.workbook.file,
        config.workbook.mcq_sheet,
        match &config.workbook.fill_sheet {
            Some(s) => format!(", fill sheet '{s}'"),
            None => String::new(),
        },
        config.store.database,
    );
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn emit(
    result: &ReconResult,
    config: &ReconConfig,
    base_dir: &Path,
    json: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(result)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    // --output wins over the config's output.json path.
    let out_path = output.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    if let Some(path) = out_path {
        std::fs::write(&path, &json_str)
            .map_err(|e| CliError::general(format!("cannot write report: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json {
        println!("{json_str}");
    }

    Ok(())
}

fn print_summary(verb: &str, result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "{verb} '{}': {} row(s) — {} in sync, {} need fixing, {} unresolved, {} not in store, {} ambiguous, {} missing options",
        result.meta.config_name,
        s.total_rows,
        s.in_sync,
        s.needs_fix,
        s.unresolved,
        s.not_in_store,
        s.ambiguous,
        s.missing_options,
    );
}

/// Shared exit policy: differences beat attention items; a clean run is 0.
fn exit_for(result: &ReconResult) -> Result<(), CliError> {
    let s = &result.summary;
    if s.needs_fix > 0 {
        return Err(CliError {
            code: EXIT_DIFFS,
            message: format!("{} row(s) need correction", s.needs_fix),
            hint: Some("run `quizkey fix` to apply the planned corrections".into()),
        });
    }
    if s.attention_needed() > 0 {
        return Err(CliError {
            code: EXIT_ATTENTION,
            message: format!("{} row(s) need manual review", s.attention_needed()),
            hint: None,
        });
    }
    Ok(())
}
