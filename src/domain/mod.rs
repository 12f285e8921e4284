//! Domain logic for world scoring and circuit search lives here.

pub mod analysis;
pub mod entities;
pub mod filter;
pub mod hexgrid;
pub mod market;
pub mod scoring;
pub mod search;
pub mod stats;

pub use analysis::{AnalysisRun, DEFAULT_CANDIDATE_LIMIT};
pub use entities::{
    Circuit, Commodity, ConfigError, CostModel, EconomicExtension, HexCoord, RawWorld,
    ShipConfig, StarportClass, TradeCode, TradeCodeSet, TradeLeg, World,
};
pub use filter::select_candidates;
pub use hexgrid::{distance, hex_distance, DistanceCache, DistanceError, SectorFrame};
pub use market::{best_leg, pair_bonus, profit_per_ton, LegQuote, MarketParams};
pub use scoring::{
    efficiency_multiplier, population_estimate, resource_output, score_batch, score_world,
    RecordError, ScoreOutcome,
};
pub use search::{CircuitSearch, SearchOutcome, SearchParams};
pub use stats::{resource_outliers, sector_statistics, OutlierWorld, SectorStatistics};
