//! Builds the engine's input from the workbook and the store per config.

use std::path::Path;

use quizkey_recon::input::{fill_rows_from_table, mcq_rows_from_table};
use quizkey_recon::model::ReconInput;
use quizkey_recon::ReconConfig;
use quizkey_store::Store;

use crate::CliError;

pub struct LoadedRun {
    pub input: ReconInput,
    pub store: Store,
}

pub fn load(config: &ReconConfig, base_dir: &Path) -> Result<LoadedRun, CliError> {
    let workbook_path = base_dir.join(&config.workbook.file);
    let columns = &config.workbook.columns;

    let mcq_table = quizkey_io::read_table(&workbook_path, Some(&config.workbook.mcq_sheet))
        .map_err(|e| CliError::parse(e.to_string()))?;
    let sheet_mcq = mcq_rows_from_table(
        &config.workbook.mcq_sheet,
        &mcq_table.headers,
        &mcq_table.rows,
        columns,
    )
    .map_err(|e| CliError::parse(e.to_string()))?;

    let sheet_fill = match &config.workbook.fill_sheet {
        Some(sheet) => {
            let table = quizkey_io::read_table(&workbook_path, Some(sheet))
                .map_err(|e| CliError::parse(e.to_string()))?;
            fill_rows_from_table(sheet, &table.headers, &table.rows, columns)
                .map_err(|e| CliError::parse(e.to_string()))?
        }
        None => Vec::new(),
    };

    let db_path = base_dir.join(&config.store.database);
    let store = Store::open(&db_path).map_err(|e| {
        CliError::store(format!("cannot open {}: {e}", db_path.display()))
            .with_hint("store.database resolves relative to the config file")
    })?;

    let mut run = LoadedRun {
        input: ReconInput { sheet_mcq, sheet_fill, ..Default::default() },
        store,
    };
    refresh_store_rows(config, &mut run)?;
    Ok(run)
}

/// (Re)load the store side of the input; sheet rows are left alone. Used on
/// first load and again for the post-fix verification pass.
pub fn refresh_store_rows(config: &ReconConfig, run: &mut LoadedRun) -> Result<(), CliError> {
    run.input.store_mcq = run
        .store
        .load_mcq_questions(config.store.mcq_type_id)
        .map_err(|e| CliError::store(e.to_string()))?;

    run.input.store_fill = if config.workbook.fill_sheet.is_some() {
        run.store
            .load_fill_answers(config.store.fill_type_id)
            .map_err(|e| CliError::store(e.to_string()))?
    } else {
        Vec::new()
    };

    Ok(())
}
