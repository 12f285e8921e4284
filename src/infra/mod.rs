//! Ingest and export surfaces around the core analysis.

pub mod export;
pub mod ingest;

pub use export::{circuit_rows, leg_rows, CircuitLegRow, CircuitRow};
pub use ingest::{ingest_records, parse_record, records_from_json, IngestOutcome, RawWorldRecord};
