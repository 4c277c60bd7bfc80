// Excel-family import (xlsx, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::{IoError, Table};

/// Import one worksheet as headers + string rows. `sheet = None` reads the
/// first worksheet.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let path_str = path.display().to_string();

    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| IoError::Read {
        path: path_str.clone(),
        message: e.to_string(),
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(IoError::SheetNotFound { path: path_str, sheet: name.to_string() });
            }
            name.to_string()
        }
        None => sheet_names.first().cloned().ok_or_else(|| IoError::Parse {
            path: path_str.clone(),
            message: "workbook contains no sheets".into(),
        })?,
    };

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| IoError::Parse {
        path: path_str.clone(),
        message: format!("sheet '{sheet_name}': {e}"),
    })?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

    let headers = rows
        .next()
        .ok_or(IoError::EmptySheet { path: path_str, sheet: sheet_name })?;

    Ok(Table { headers, rows: rows.collect() })
}

/// Stringify a cell the way the exporter's consumers expect: integral
/// numbers without a trailing `.0` (years and ids come back as floats from
/// Excel), everything else via its natural text form.
fn cell_to_string(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => float_to_string(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#{e:?}"),
        // Raw serial; answer-key sheets don't carry dates, so no date math.
        Data::DateTime(dt) => float_to_string(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

fn float_to_string(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_lose_the_point() {
        assert_eq!(cell_to_string(&Data::Float(1968.0)), "1968");
        assert_eq!(cell_to_string(&Data::Float(-3.0)), "-3");
    }

    #[test]
    fn fractional_floats_keep_their_digits() {
        assert_eq!(cell_to_string(&Data::Float(3.5)), "3.5");
    }

    #[test]
    fn strings_and_empties_pass_through() {
        assert_eq!(cell_to_string(&Data::String("Port Louis".into())), "Port Louis");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = import(Path::new("no-such-file.xlsx"), None).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }
}
