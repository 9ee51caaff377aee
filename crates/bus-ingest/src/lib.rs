//! Bulk upload sheet ingestion.
//!
//! Reads flat spreadsheet rows ([`CsvRowSource`]), maps their headers onto
//! schema nodes ([`ColumnPlan`]) and folds them into nested per-resource
//! documents ([`Unflattener`]).

pub mod csv_rows;
pub mod header;
pub mod unflatten;

pub use csv_rows::CsvRowSource;
pub use header::{ColumnPlan, ColumnTarget, canonical_header};
pub use unflatten::Unflattener;
