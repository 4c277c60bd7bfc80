// CSV/TSV import

use std::path::Path;

use crate::{IoError, Table};

pub fn import(path: &Path) -> Result<Table, IoError> {
    let content = std::fs::read_to_string(path).map_err(|e| IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(path, &content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the
/// first few lines. The candidate producing the most fields, consistently
/// and >1 per line, wins; comma is the fallback.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample: Vec<&str> = content.lines().take(10).collect();

    if sample.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0usize;

    for &delim in candidates {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let first = counts.first().copied().unwrap_or(0);
        if first <= 1 {
            continue;
        }
        let consistent = counts.iter().all(|&c| c == first);
        let score = if consistent { first * 2 } else { first };
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn import_from_string(path: &Path, content: &str, delimiter: u8) -> Result<Table, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().map(|s| s.to_string()).collect(),
        Some(Err(e)) => {
            return Err(IoError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
        None => {
            return Err(IoError::EmptySheet {
                path: path.display().to_string(),
                sheet: "csv".into(),
            })
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| IoError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(Table { headers, rows })
}
