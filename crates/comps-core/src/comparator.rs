use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CompsError;
use crate::metric::Metric;
use crate::ratios::{self, display_cell, MetricKind, RatioInput};
use crate::types::*;
use crate::CompsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a cross-company comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    /// Companies in presentation order. Order is preserved in the output.
    pub companies: Vec<RatioInput>,
    /// Column order, caller-specified. See `MetricKind::DEFAULT_COLUMNS`.
    pub columns: Vec<MetricKind>,
}

/// One company's row: cells aligned with the table's column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRow {
    pub ticker: String,
    pub company: String,
    pub cells: Vec<Metric>,
    /// Presentation strings for each cell, in the unit conventional for
    /// the column (percent, multiple, scaled dollars).
    pub formatted: Vec<String>,
}

/// The comparison table. Rows are never dropped: a company whose record
/// could not be processed still appears, with every cell `NotAvailable`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub columns: Vec<MetricKind>,
    pub rows: Vec<CompanyRow>,
}

impl ComparisonTable {
    /// Look up one cell by ticker and metric.
    pub fn cell(&self, ticker: &str, kind: MetricKind) -> Option<Metric> {
        let col = self.columns.iter().position(|c| *c == kind)?;
        self.rows
            .iter()
            .find(|r| r.ticker == ticker)
            .and_then(|r| r.cells.get(col).copied())
    }

    /// Ticker holding the highest numeric value in a column. Sentinel
    /// cells are skipped; a pure read over the table.
    pub fn leader(&self, kind: MetricKind) -> Option<(&str, Decimal)> {
        let col = self.columns.iter().position(|c| *c == kind)?;
        self.rows
            .iter()
            .filter_map(|r| {
                r.cells
                    .get(col)
                    .and_then(|m| m.value())
                    .map(|v| (r.ticker.as_str(), v))
            })
            .max_by(|a, b| a.1.cmp(&b.1))
    }

    /// Header row for tabular rendering: Ticker, Company, then columns.
    pub fn headers(&self) -> Vec<String> {
        let mut h = vec!["Ticker".to_string(), "Company".to_string()];
        h.extend(self.columns.iter().map(|c| c.to_string()));
        h
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build a comparison table across companies.
///
/// A company whose record fails validation does not abort the batch: it
/// keeps its row with `NotAvailable` cells and contributes a warning.
pub fn build_comparison(
    input: &ComparisonInput,
) -> CompsResult<ComputationOutput<ComparisonTable>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.companies.is_empty() {
        return Err(CompsError::InsufficientData(
            "No companies supplied for comparison".into(),
        ));
    }
    if input.columns.is_empty() {
        return Err(CompsError::InvalidInput {
            field: "columns".into(),
            reason: "At least one metric column must be specified".into(),
        });
    }

    let mut rows = Vec::with_capacity(input.companies.len());

    for company in &input.companies {
        let row = match ratios::validate_record(&company.record) {
            Ok(()) => {
                let set = ratios::derive_ratio_set(company, &mut warnings);
                let cells: Vec<Metric> =
                    input.columns.iter().map(|k| set.metric(*k)).collect();
                make_row(&company.record, &input.columns, cells)
            }
            Err(e) => {
                warnings.push(format!(
                    "{}: record rejected ({e}); row retained with N/A cells",
                    company.record.ticker
                ));
                let cells = vec![Metric::NotAvailable; input.columns.len()];
                make_row(&company.record, &input.columns, cells)
            }
        };
        rows.push(row);
    }

    let output = ComparisonTable {
        columns: input.columns.clone(),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cross-Company Comparison",
        &serde_json::json!({
            "companies": input.companies.iter().map(|c| c.record.ticker.clone()).collect::<Vec<_>>(),
            "columns": input.columns,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn make_row(
    record: &FinancialStatementRecord,
    columns: &[MetricKind],
    cells: Vec<Metric>,
) -> CompanyRow {
    let formatted = columns
        .iter()
        .zip(cells.iter())
        .map(|(k, m)| display_cell(*k, *m))
        .collect();
    CompanyRow {
        ticker: record.ticker.clone(),
        company: record.company.clone(),
        cells,
        formatted,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
