use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::logic::error::{ReplicatorError, Result};
use super::types::{Attribute, AttributeKind, Dataset, Header, Instance};

/// Load a CSV file; see `read_csv`
pub fn load_csv(path: &Path) -> Result<Dataset> {
    log::info!("Loading dataset from: {}", path.display());
    let file = File::open(path)?;
    read_csv(file)
}

/// Load a CSV file against a known header; see `read_csv_with_header`
pub fn load_csv_with_header(path: &Path, header: &Header) -> Result<Dataset> {
    log::info!("Loading dataset from: {} (fixed header)", path.display());
    let file = File::open(path)?;
    read_csv_with_header(file, header)
}

/// Parse CSV with a header row. The last column is the class, values in
/// first-seen order (first = normal). Feature columns become numeric when
/// every cell parses as a number, date when every cell is RFC 3339, string
/// otherwise. Empty cells and `?` are missing.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let (names, records) = read_records(reader)?;
    let feature_count = names.len() - 1;

    // Column kinds
    let mut attributes: Vec<Attribute> = Vec::with_capacity(names.len());
    for (col, name) in names.iter().take(feature_count).enumerate() {
        let cells = records.iter().map(|r| r.get(col).unwrap_or(""));
        attributes.push(Attribute { name: name.clone(), kind: infer_kind(cells) });
    }

    // Class values, first-seen order
    let mut class_values: Vec<String> = Vec::new();
    for record in &records {
        let cell = record.get(feature_count).unwrap_or("");
        if !is_missing(cell) && !class_values.iter().any(|v| v == cell) {
            class_values.push(cell.to_string());
        }
    }
    attributes.push(Attribute::nominal(&names[feature_count], class_values.as_slice()));

    let header = Header::new(attributes, feature_count)?;
    build_dataset(header, &records)
}

/// Parse CSV rows using the column kinds and class values of `header`
/// instead of inferring them. Cells that do not parse under the declared
/// kind become missing; class values the header does not declare leave the
/// row unlabeled.
pub fn read_csv_with_header<R: Read>(reader: R, header: &Header) -> Result<Dataset> {
    let (names, records) = read_records(reader)?;
    if names.len() != header.attributes.len() {
        return Err(ReplicatorError::invalid_dataset(format!(
            "expected {} columns, found {}",
            header.attributes.len(),
            names.len()
        )));
    }

    build_dataset(header.clone(), &records)
}

fn read_records<R: Read>(reader: R) -> Result<(Vec<String>, Vec<StringRecord>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let names: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if names.len() < 2 {
        return Err(ReplicatorError::invalid_dataset(
            "need at least one feature column and a class column",
        ));
    }

    let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((names, records))
}

fn build_dataset(header: Header, records: &[StringRecord]) -> Result<Dataset> {
    let mut dataset = Dataset::new(header);
    let class_index = dataset.header.class_index;

    for record in records {
        let mut features = Vec::with_capacity(dataset.header.feature_count());
        let mut label = None;

        for (col, attribute) in dataset.header.attributes.iter().enumerate() {
            let cell = record.get(col).unwrap_or("");
            if col == class_index {
                if let AttributeKind::Nominal(values) = &attribute.kind {
                    label = values.iter().position(|v| v == cell);
                }
            } else {
                features.push(parse_cell(cell, &attribute.kind));
            }
        }

        dataset.push(Instance::new(features, label));
    }

    log::info!(
        "Loaded {} rows ({} features, {} class values)",
        dataset.len(),
        dataset.feature_count(),
        dataset.header.num_classes()
    );
    Ok(dataset)
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell == "?"
}

fn parse_date(cell: &str) -> Option<f64> {
    chrono::DateTime::parse_from_rfc3339(cell)
        .ok()
        .map(|d| d.timestamp_millis() as f64)
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> AttributeKind {
    let present = cells.filter(|c| !is_missing(c));

    if present.clone().all(|c| c.parse::<f64>().is_ok()) {
        AttributeKind::Numeric
    } else if present.clone().all(|c| parse_date(c).is_some()) {
        AttributeKind::Date
    } else {
        AttributeKind::Text
    }
}

fn parse_cell(cell: &str, kind: &AttributeKind) -> f64 {
    if is_missing(cell) {
        return f64::NAN;
    }
    match kind {
        AttributeKind::Numeric => cell.parse().unwrap_or(f64::NAN),
        AttributeKind::Date => parse_date(cell).unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
