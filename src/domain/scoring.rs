//! Economic scoring: derives comparable output metrics from raw records.

use rayon::prelude::*;
use thiserror::Error;
use tracing::warn;

use super::entities::{EconomicExtension, RawWorld, World};

/// Validation failures for a single catalog record. The offending record
/// is dropped from the scored set; the batch continues.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("unrecognized starport class {0:?}")]
    UnknownStarport(char),
    #[error("population exponent {0} outside 0-15")]
    PopulationOutOfRange(u8),
    #[error("malformed world profile {0:?}")]
    MalformedProfile(String),
    #[error("malformed economic extension {0:?}")]
    MalformedExtension(String),
    #[error("hex coordinate {0:?} outside the sector grid")]
    HexOutOfBounds(String),
}

pub const MAX_POPULATION_EXP: u8 = 15;

/// Population estimate: ten to the recorded exponent.
pub fn population_estimate(exp: u8) -> Result<u64, RecordError> {
    if exp > MAX_POPULATION_EXP {
        return Err(RecordError::PopulationOutOfRange(exp));
    }
    Ok(10u64.pow(exp as u32))
}

/// Efficiency multiplier, symmetric around 1.0 and strictly positive.
pub fn efficiency_multiplier(efficiency: i8) -> f64 {
    if efficiency >= 0 {
        1.0 + efficiency as f64 / 10.0
    } else {
        1.0 / (1.0 + efficiency.unsigned_abs() as f64 / 10.0)
    }
}

/// Resource output: R x L x I scaled by the efficiency multiplier.
///
/// Zero components are lifted to 1 so a small economy stays nonzero
/// instead of zeroing the whole product.
pub fn resource_output(ext: &EconomicExtension) -> f64 {
    let resources = ext.resources.max(1) as f64;
    let labor = ext.labor.max(1) as f64;
    let infrastructure = ext.infrastructure.max(1) as f64;
    resources * labor * infrastructure * efficiency_multiplier(ext.efficiency)
}

/// Score one record into a [`World`].
///
/// Pure and deterministic: identical raw input always yields identical
/// derived fields.
pub fn score_world(raw: RawWorld) -> Result<World, RecordError> {
    let population = population_estimate(raw.population_exp)?;
    Ok(World {
        starport_score: raw.starport.score(),
        population,
        resource_output: resource_output(&raw.extension),
        name: raw.name,
        sector: raw.sector,
        hex: raw.hex,
        allegiance: raw.allegiance,
        starport: raw.starport,
        population_exp: raw.population_exp,
        trade_codes: raw.trade_codes,
        extension: raw.extension,
    })
}

/// Result of scoring a batch: valid worlds plus a count of rejects.
#[derive(Debug)]
pub struct ScoreOutcome {
    pub worlds: Vec<World>,
    pub dropped: usize,
}

/// Score a batch of records in parallel.
///
/// Invalid records are dropped individually and counted; a bad record
/// never aborts the batch.
pub fn score_batch(records: Vec<RawWorld>) -> ScoreOutcome {
    let results: Vec<Result<World, (String, String, RecordError)>> = records
        .into_par_iter()
        .map(|record| {
            let name = record.name.clone();
            let sector = record.sector.clone();
            score_world(record).map_err(|err| (name, sector, err))
        })
        .collect();

    let mut worlds = Vec::with_capacity(results.len());
    let mut dropped = 0;
    for result in results {
        match result {
            Ok(world) => worlds.push(world),
            Err((name, sector, err)) => {
                dropped += 1;
                warn!("dropping record {name} ({sector}): {err}");
            }
        }
    }
    ScoreOutcome { worlds, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{HexCoord, StarportClass, TradeCodeSet};

    fn raw(name: &str, extension: EconomicExtension) -> RawWorld {
        RawWorld {
            name: name.to_string(),
            sector: "Testward".to_string(),
            hex: HexCoord::new(1, 1).unwrap(),
            allegiance: None,
            starport: StarportClass::C,
            population_exp: 6,
            trade_codes: TradeCodeSet::new(),
            extension,
        }
    }

    fn ext(r: u8, l: u8, i: u8, e: i8) -> EconomicExtension {
        EconomicExtension {
            resources: r,
            labor: l,
            infrastructure: i,
            efficiency: e,
        }
    }

    #[test]
    fn multiplier_is_one_at_zero() {
        assert_eq!(efficiency_multiplier(0), 1.0);
    }

    #[test]
    fn multiplier_strictly_increasing_and_positive() {
        let mut previous = f64::NEG_INFINITY;
        for e in -10..=10 {
            let m = efficiency_multiplier(e as i8);
            assert!(m > 0.0, "multiplier for {e} not positive");
            assert!(m > previous, "multiplier not increasing at {e}");
            previous = m;
        }
    }

    #[test]
    fn multiplier_symmetric_around_one() {
        for e in 1..=5i8 {
            let up = efficiency_multiplier(e);
            let down = efficiency_multiplier(-e);
            assert!((up * down - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn resource_output_scales_linearly_in_each_component() {
        let base = resource_output(&ext(2, 3, 4, 0));
        assert_eq!(resource_output(&ext(4, 3, 4, 0)), base * 2.0);
        assert_eq!(resource_output(&ext(2, 6, 4, 0)), base * 2.0);
        assert_eq!(resource_output(&ext(2, 3, 8, 0)), base * 2.0);
    }

    #[test]
    fn resource_output_positive_for_zero_components() {
        let value = resource_output(&ext(0, 0, 0, 0));
        assert_eq!(value, 1.0);
        assert!(resource_output(&ext(0, 0, 0, -5)) > 0.0);
    }

    #[test]
    fn population_estimate_bounds() {
        assert_eq!(population_estimate(0).unwrap(), 1);
        assert_eq!(population_estimate(6).unwrap(), 1_000_000);
        assert_eq!(population_estimate(15).unwrap(), 10u64.pow(15));
        assert_eq!(
            population_estimate(16),
            Err(RecordError::PopulationOutOfRange(16))
        );
    }

    #[test]
    fn scoring_is_deterministic() {
        let a = score_world(raw("Regina", ext(13, 7, 14, 5))).unwrap();
        let b = score_world(raw("Regina", ext(13, 7, 14, 5))).unwrap();
        assert_eq!(a.resource_output, b.resource_output);
        assert_eq!(a.population, b.population);
        assert_eq!(a.starport_score, b.starport_score);
    }

    #[test]
    fn batch_drops_invalid_records_and_keeps_the_rest() {
        let mut bad = raw("Farhaven", ext(1, 1, 1, 0));
        bad.population_exp = 40;
        let records = vec![raw("Regina", ext(2, 2, 2, 0)), bad];

        let outcome = score_batch(records);
        assert_eq!(outcome.worlds.len(), 1);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.worlds[0].name, "Regina");
    }
}
