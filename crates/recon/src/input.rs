//! Column-mapped extraction of typed sheet rows from a generic
//! headers-plus-string-rows table (the IO layer's output shape).

use crate::config::ColumnMapping;
use crate::error::ReconError;
use crate::model::{SheetFillRow, SheetQuestion};

fn column_index(sheet: &str, headers: &[String], name: &str) -> Result<usize, ReconError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| ReconError::MissingColumn {
            sheet: sheet.to_string(),
            column: name.to_string(),
        })
}

fn cell(row: &[String], index: usize) -> String {
    row.get(index).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Extract MCQ rows. Rows with a blank question cell are skipped; trailing
/// blank option cells are dropped so labels always map 0-based onto the
/// options actually present. Worksheet row numbers start at 2 (row 1 is the
/// header).
pub fn mcq_rows_from_table(
    sheet: &str,
    headers: &[String],
    rows: &[Vec<String>],
    columns: &ColumnMapping,
) -> Result<Vec<SheetQuestion>, ReconError> {
    let question_idx = column_index(sheet, headers, &columns.question)?;
    let correct_idx = column_index(sheet, headers, &columns.correct_answer)?;
    let option_idx: Vec<usize> = columns
        .options
        .iter()
        .map(|name| column_index(sheet, headers, name))
        .collect::<Result<_, _>>()?;

    let mut out = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let question = cell(row, question_idx);
        if question.is_empty() {
            continue;
        }

        let mut options: Vec<String> = option_idx.iter().map(|&ix| cell(row, ix)).collect();
        while options.last().is_some_and(|o| o.is_empty()) {
            options.pop();
        }

        out.push(SheetQuestion {
            row: (i + 2) as u32,
            question,
            options,
            correct_answer: cell(row, correct_idx),
        });
    }

    Ok(out)
}

/// Extract fill-in-the-blank rows. Same skipping rules as the MCQ sheet.
pub fn fill_rows_from_table(
    sheet: &str,
    headers: &[String],
    rows: &[Vec<String>],
    columns: &ColumnMapping,
) -> Result<Vec<SheetFillRow>, ReconError> {
    let question_idx = column_index(sheet, headers, &columns.question)?;
    let answer_idx = column_index(sheet, headers, &columns.answer)?;

    let mut out = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let question = cell(row, question_idx);
        if question.is_empty() {
            continue;
        }
        out.push(SheetFillRow {
            row: (i + 2) as u32,
            question,
            answer: cell(row, answer_idx),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extracts_mcq_rows() {
        let h = headers(&["question", "optionA", "optionB", "optionC", "optionD", "correctAnswer"]);
        let rows = vec![
            row(&["Capital of Mauritius?", "Port Louis", "Curepipe", "Rose Hill", "Vacoas", "Port Louis"]),
            row(&["", "", "", "", "", ""]),
            row(&["Independence year?", "1965", "1968", "", "", "B"]),
        ];
        let out = mcq_rows_from_table("MCQ", &h, &rows, &ColumnMapping::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].row, 2);
        assert_eq!(out[0].options.len(), 4);
        assert_eq!(out[1].row, 4);
        // trailing blanks dropped
        assert_eq!(out[1].options, vec!["1965", "1968"]);
        assert_eq!(out[1].correct_answer, "B");
    }

    #[test]
    fn missing_column_is_reported_with_sheet_name() {
        let h = headers(&["question", "optionA", "optionB"]);
        let err = mcq_rows_from_table("MCQ", &h, &[], &ColumnMapping::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'MCQ'"), "{msg}");
        assert!(msg.contains("optionC") || msg.contains("correctAnswer"), "{msg}");
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let h = headers(&["question", "optionA", "optionB", "optionC", "optionD", "correctAnswer"]);
        let rows = vec![row(&["Truncated row?", "Yes"])];
        let out = mcq_rows_from_table("MCQ", &h, &rows, &ColumnMapping::default()).unwrap();
        assert_eq!(out[0].options, vec!["Yes"]);
        assert_eq!(out[0].correct_answer, "");
    }

    #[test]
    fn extracts_fill_rows() {
        let h = headers(&["question", "answer"]);
        let rows = vec![
            row(&["The first governor was ____", "Denis de Nyon"]),
            row(&["", "orphan answer"]),
        ];
        let out = fill_rows_from_table("Fill", &h, &rows, &ColumnMapping::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].answer, "Denis de Nyon");
    }
}
