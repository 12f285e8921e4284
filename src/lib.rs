//! Trade circuit analysis for sector trade data.
//!
//! Scores raw world records into comparable economic metrics, then
//! searches the scored set for profitable closed trade circuits under a
//! ship's jump-range and cargo constraints. Acquisition of raw catalog
//! tables and rendering of reports live outside this crate; the ingest
//! and export modules define the tabular forms exchanged with them.

pub mod domain;
pub mod infra;
pub mod util;

pub use domain::{
    AnalysisRun, Circuit, CircuitSearch, ConfigError, MarketParams, RawWorld, SearchOutcome,
    SearchParams, SectorFrame, ShipConfig, TradeLeg, World,
};
pub use infra::{ingest_records, records_from_json, RawWorldRecord};
