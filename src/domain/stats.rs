//! Sector-level aggregates over scored worlds.

use std::collections::BTreeMap;

use serde::Serialize;

use super::entities::{TradeCode, World};

/// Aggregate economic figures for one sector.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectorStatistics {
    pub sector: String,
    pub world_count: usize,
    pub total_resource_output: f64,
    pub mean_resource_output: f64,
    pub total_population: f64,
    pub mean_starport_score: f64,
    pub pct_agricultural: f64,
    pub pct_industrial: f64,
    pub pct_rich: f64,
    pub pct_high_population: f64,
    pub pct_poor: f64,
    /// Resource output per head of population.
    pub output_per_capita: f64,
}

fn by_sector(worlds: &[World]) -> BTreeMap<&str, Vec<&World>> {
    let mut groups: BTreeMap<&str, Vec<&World>> = BTreeMap::new();
    for world in worlds {
        groups.entry(world.sector.as_str()).or_default().push(world);
    }
    groups
}

fn pct(members: &[&World], code: TradeCode) -> f64 {
    let hits = members
        .iter()
        .filter(|w| w.trade_codes.contains(code))
        .count();
    hits as f64 / members.len() as f64 * 100.0
}

/// Aggregate statistics per sector, ordered by sector name.
pub fn sector_statistics(worlds: &[World]) -> Vec<SectorStatistics> {
    by_sector(worlds)
        .into_iter()
        .map(|(sector, members)| {
            let count = members.len();
            let total_output: f64 = members.iter().map(|w| w.resource_output).sum();
            let total_population: f64 = members.iter().map(|w| w.population as f64).sum();
            let mean_starport: f64 =
                members.iter().map(|w| w.starport_score as f64).sum::<f64>() / count as f64;
            SectorStatistics {
                sector: sector.to_string(),
                world_count: count,
                total_resource_output: total_output,
                mean_resource_output: total_output / count as f64,
                total_population,
                mean_starport_score: mean_starport,
                pct_agricultural: pct(&members, TradeCode::Agricultural),
                pct_industrial: pct(&members, TradeCode::Industrial),
                pct_rich: pct(&members, TradeCode::Rich),
                pct_high_population: pct(&members, TradeCode::HighPopulation),
                pct_poor: pct(&members, TradeCode::Poor),
                output_per_capita: if total_population > 0.0 {
                    total_output / total_population
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// A world whose output is unusually high for its sector.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutlierWorld {
    pub name: String,
    pub sector: String,
    pub hex: String,
    pub resource_output: f64,
    pub z_score: f64,
}

/// Worlds whose resource output sits more than `threshold` sample
/// standard deviations above their sector mean, highest first. Sectors
/// with fewer than two worlds carry no spread and are skipped.
pub fn resource_outliers(worlds: &[World], threshold: f64) -> Vec<OutlierWorld> {
    let mut outliers = Vec::new();
    for (_, members) in by_sector(worlds) {
        if members.len() < 2 {
            continue;
        }
        let count = members.len() as f64;
        let mean = members.iter().map(|w| w.resource_output).sum::<f64>() / count;
        let variance = members
            .iter()
            .map(|w| (w.resource_output - mean).powi(2))
            .sum::<f64>()
            / (count - 1.0);
        let deviation = variance.sqrt();
        if deviation == 0.0 {
            continue;
        }
        for world in members {
            let z_score = (world.resource_output - mean) / deviation;
            if z_score > threshold {
                outliers.push(OutlierWorld {
                    name: world.name.clone(),
                    sector: world.sector.clone(),
                    hex: world.hex.label(),
                    resource_output: world.resource_output,
                    z_score,
                });
            }
        }
    }
    outliers.sort_by(|a, b| {
        b.z_score
            .partial_cmp(&a.z_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    outliers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        EconomicExtension, HexCoord, RawWorld, StarportClass,
    };
    use crate::domain::scoring::score_world;

    fn world(name: &str, sector: &str, resources: u8, codes: &[TradeCode]) -> World {
        score_world(RawWorld {
            name: name.to_string(),
            sector: sector.to_string(),
            hex: HexCoord::new(1, 1).unwrap(),
            allegiance: None,
            starport: StarportClass::B,
            population_exp: 6,
            trade_codes: codes.iter().copied().collect(),
            extension: EconomicExtension {
                resources,
                labor: 2,
                infrastructure: 2,
                efficiency: 0,
            },
        })
        .unwrap()
    }

    #[test]
    fn aggregates_group_by_sector() {
        let worlds = vec![
            world("Alef", "Near", 2, &[TradeCode::Agricultural]),
            world("Bet", "Near", 4, &[]),
            world("Gimel", "Far", 6, &[TradeCode::Industrial]),
        ];
        let stats = sector_statistics(&worlds);
        assert_eq!(stats.len(), 2);

        // BTreeMap ordering: "Far" before "Near".
        assert_eq!(stats[0].sector, "Far");
        assert_eq!(stats[0].world_count, 1);
        assert_eq!(stats[0].pct_industrial, 100.0);

        assert_eq!(stats[1].sector, "Near");
        assert_eq!(stats[1].world_count, 2);
        assert_eq!(stats[1].pct_agricultural, 50.0);
        assert_eq!(stats[1].total_resource_output, 8.0 + 16.0);
        assert_eq!(stats[1].mean_starport_score, 3.0);
    }

    #[test]
    fn per_capita_handles_population() {
        let worlds = vec![world("Alef", "Near", 5, &[])];
        let stats = sector_statistics(&worlds);
        let expected = stats[0].total_resource_output / 1_000_000.0;
        assert!((stats[0].output_per_capita - expected).abs() < 1e-12);
    }

    #[test]
    fn outliers_need_real_spread() {
        // Nine quiet worlds and one boomtown.
        let mut worlds: Vec<World> = (0..9)
            .map(|i| world(&format!("Quiet {i}"), "Near", 2, &[]))
            .collect();
        worlds.push(world("Boomtown", "Near", 30, &[]));

        let outliers = resource_outliers(&worlds, 2.0);
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].name, "Boomtown");
        assert!(outliers[0].z_score > 2.0);

        // A flat sector produces none.
        let flat = vec![
            world("Same", "Flat", 3, &[]),
            world("Again", "Flat", 3, &[]),
        ];
        assert!(resource_outliers(&flat, 2.0).is_empty());
    }
}
