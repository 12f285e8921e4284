//! One end-to-end analysis run: score, filter, search.

use tracing::info;

use super::entities::{ConfigError, RawWorld, ShipConfig, World};
use super::filter::select_candidates;
use super::hexgrid::SectorFrame;
use super::scoring::score_batch;
use super::search::{CircuitSearch, SearchOutcome};
use super::stats::{resource_outliers, sector_statistics, OutlierWorld, SectorStatistics};

/// Default size of the high-value subset fed to the circuit search.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 50;

/// Scored state for one analysis run.
///
/// Owns every cache the run needs and is discarded with the run, so a
/// later run with different inputs or frames can never observe stale
/// state. Worlds are read-only once scored.
pub struct AnalysisRun {
    worlds: Vec<World>,
    dropped_records: usize,
    frame: Option<SectorFrame>,
    candidate_limit: usize,
}

impl AnalysisRun {
    /// Score a batch of raw records. Invalid records are dropped and
    /// counted, never fatal to the batch.
    pub fn from_records(records: Vec<RawWorld>) -> Self {
        let outcome = score_batch(records);
        info!(
            "scored {} worlds ({} records dropped)",
            outcome.worlds.len(),
            outcome.dropped
        );
        Self {
            worlds: outcome.worlds,
            dropped_records: outcome.dropped,
            frame: None,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }

    /// Supply sector placements so cross-sector legs become computable.
    pub fn with_frame(mut self, frame: SectorFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = limit;
        self
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    /// How many records failed validation during scoring.
    pub fn dropped_records(&self) -> usize {
        self.dropped_records
    }

    pub fn sector_statistics(&self) -> Vec<SectorStatistics> {
        sector_statistics(&self.worlds)
    }

    pub fn resource_outliers(&self, threshold: f64) -> Vec<OutlierWorld> {
        resource_outliers(&self.worlds, threshold)
    }

    /// Filter to the high-value subset and search for circuits with
    /// default market and budget parameters.
    pub fn find_circuits(&self, config: &ShipConfig) -> Result<SearchOutcome, ConfigError> {
        self.find_circuits_with(&CircuitSearch::new(*config))
    }

    /// Same, but with a caller-tuned search.
    pub fn find_circuits_with(
        &self,
        search: &CircuitSearch,
    ) -> Result<SearchOutcome, ConfigError> {
        // Validate before filtering; a bad config must fail before any
        // computation starts.
        search.config.validate()?;
        let candidates = select_candidates(&self.worlds, self.candidate_limit);
        search.run(&candidates, self.frame.as_ref())
    }
}
