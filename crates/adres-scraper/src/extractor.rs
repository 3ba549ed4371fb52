//! Table extraction: turns result-window tables into a canonical record.
//!
//! The result window carries two tables. The first is vertical: each data
//! row holds a label cell and a value cell. The second is horizontal: the
//! first row holds labels and the second row holds the values, paired by
//! position. Labels are cleaned and looked up in the field dictionary;
//! unknown labels are skipped.

use std::collections::BTreeMap;

use adres_browser::{RowSnapshot, TableSnapshot};
use tracing::{debug, warn};

use crate::fields::{lookup_label, CanonicalField};
use crate::record::CanonicalRecord;

const VERTICAL_TABLE: usize = 0;
const HORIZONTAL_TABLE: usize = 1;

/// Shape problems seen while extracting. None of them fail the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionAnomaly {
    /// A vertical-table row with data cells, but not exactly two.
    MalformedRow { row: usize, cells: usize },
    /// The horizontal table has a header row and no value row.
    MissingValueRow,
    /// Horizontal header and value counts differ; the surplus is dropped.
    LengthMismatch { headers: usize, values: usize },
    /// A field was written twice; the later value was kept.
    Overwritten { field: CanonicalField },
}

/// Extracted record plus whatever did not fit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub record: CanonicalRecord,
    pub anomalies: Vec<ExtractionAnomaly>,
}

/// Trim, then collapse every run of line breaks into a single space.
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_break = false;

    for ch in raw.trim().chars() {
        if ch == '\n' || ch == '\r' {
            in_break = true;
            continue;
        }
        if in_break {
            out.push(' ');
            in_break = false;
        }
        out.push(ch);
    }

    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TableExtractor;

impl TableExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract from the snapshots the classifier captured. Tables beyond
    /// the second are ignored.
    pub fn extract(&self, tables: &[TableSnapshot]) -> Extraction {
        let mut builder = RecordBuilder::default();

        if let Some(table) = tables.get(VERTICAL_TABLE) {
            self.extract_vertical(table, &mut builder);
        }

        if let Some(table) = tables.get(HORIZONTAL_TABLE) {
            self.extract_horizontal(table, &mut builder);
        }

        if tables.len() > HORIZONTAL_TABLE + 1 {
            debug!("Ignoring {} extra result tables", tables.len() - HORIZONTAL_TABLE - 1);
        }

        let extraction = builder.finish();
        for anomaly in &extraction.anomalies {
            warn!("Extraction anomaly: {:?}", anomaly);
        }
        extraction
    }

    fn extract_vertical(&self, table: &TableSnapshot, builder: &mut RecordBuilder) {
        for (index, row) in table.rows.iter().enumerate() {
            let cells: Vec<&str> = row.data_cells().map(|c| c.text.as_str()).collect();
            match cells.as_slice() {
                // Header-only or empty rows.
                [] => {}
                [label, value] => builder.set(label, value),
                _ => builder.anomaly(ExtractionAnomaly::MalformedRow {
                    row: index,
                    cells: cells.len(),
                }),
            }
        }
    }

    fn extract_horizontal(&self, table: &TableSnapshot, builder: &mut RecordBuilder) {
        let Some(header_row) = table.rows.first() else {
            return;
        };
        let Some(value_row) = table.rows.get(1) else {
            builder.anomaly(ExtractionAnomaly::MissingValueRow);
            return;
        };

        let headers = all_cells(header_row);
        let values: Vec<&str> = value_row.data_cells().map(|c| c.text.as_str()).collect();

        if headers.len() != values.len() {
            builder.anomaly(ExtractionAnomaly::LengthMismatch {
                headers: headers.len(),
                values: values.len(),
            });
        }

        for (label, value) in headers.iter().zip(values.iter()) {
            builder.set(label, value);
        }
    }
}

/// Header rows may use `<th>` or `<td>`.
fn all_cells(row: &RowSnapshot) -> Vec<&str> {
    row.cells.iter().map(|c| c.text.as_str()).collect()
}

#[derive(Default)]
struct RecordBuilder {
    fields: BTreeMap<CanonicalField, String>,
    anomalies: Vec<ExtractionAnomaly>,
}

impl RecordBuilder {
    fn set(&mut self, raw_label: &str, raw_value: &str) {
        let label = clean_text(raw_label);
        let Some(field) = lookup_label(&label) else {
            if !label.is_empty() {
                debug!("Skipping unknown label {:?}", label);
            }
            return;
        };

        if self.fields.insert(field, clean_text(raw_value)).is_some() {
            self.anomalies.push(ExtractionAnomaly::Overwritten { field });
        }
    }

    fn anomaly(&mut self, anomaly: ExtractionAnomaly) {
        self.anomalies.push(anomaly);
    }

    fn finish(self) -> Extraction {
        Extraction {
            record: self.fields.into(),
            anomalies: self.anomalies,
        }
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
