//! Candidate filtering: bounds the combinatorial search to the worlds
//! that matter.
//!
//! Full enumeration over thousands of worlds is intractable; a top-N cut
//! by resource output keeps the circuits that matter while bounding the
//! edge set to O(N^2).

use std::cmp::Ordering;

use tracing::debug;

use super::entities::{TradeCode, World};

/// Top `limit` worlds by resource output, plus every naval-base world
/// outside the cut. Naval bases anchor circuits out of proportion to
/// their raw output and are always kept.
///
/// Ties break on higher starport score, then lexicographically smaller
/// name, so repeated runs select identically.
pub fn select_candidates(worlds: &[World], limit: usize) -> Vec<World> {
    let mut ranked: Vec<&World> = worlds.iter().collect();
    ranked.sort_by(|a, b| {
        b.resource_output
            .partial_cmp(&a.resource_output)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.starport_score.cmp(&a.starport_score))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut selected: Vec<World> = ranked.iter().take(limit).map(|w| (*w).clone()).collect();
    for world in ranked.iter().skip(limit) {
        if world.trade_codes.contains(TradeCode::NavalBase) {
            selected.push((*world).clone());
        }
    }

    debug!(
        "candidate filter kept {} of {} worlds (limit {limit})",
        selected.len(),
        worlds.len()
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        EconomicExtension, HexCoord, RawWorld, StarportClass, TradeCodeSet,
    };
    use crate::domain::scoring::score_world;

    fn world(name: &str, output: u8, starport: StarportClass, codes: &[TradeCode]) -> World {
        score_world(RawWorld {
            name: name.to_string(),
            sector: "Testward".to_string(),
            hex: HexCoord::new(1, 1).unwrap(),
            allegiance: None,
            starport,
            population_exp: 5,
            trade_codes: codes.iter().copied().collect::<TradeCodeSet>(),
            extension: EconomicExtension {
                resources: output,
                labor: 1,
                infrastructure: 1,
                efficiency: 0,
            },
        })
        .unwrap()
    }

    #[test]
    fn keeps_the_top_n_by_output() {
        let worlds = vec![
            world("Low", 1, StarportClass::C, &[]),
            world("High", 9, StarportClass::C, &[]),
            world("Mid", 5, StarportClass::C, &[]),
        ];
        let selected = select_candidates(&worlds, 2);
        let names: Vec<&str> = selected.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid"]);
    }

    #[test]
    fn naval_bases_survive_the_cut() {
        let worlds = vec![
            world("High", 9, StarportClass::C, &[]),
            world("Mid", 5, StarportClass::C, &[]),
            world("Depot", 1, StarportClass::C, &[TradeCode::NavalBase]),
        ];
        let selected = select_candidates(&worlds, 2);
        let names: Vec<&str> = selected.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Depot"]);
    }

    #[test]
    fn ties_break_on_starport_then_name() {
        let worlds = vec![
            world("Bravo", 5, StarportClass::C, &[]),
            world("Alpha", 5, StarportClass::C, &[]),
            world("Zulu", 5, StarportClass::A, &[]),
        ];
        let selected = select_candidates(&worlds, 3);
        let names: Vec<&str> = selected.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Bravo"]);
    }

    #[test]
    fn limit_larger_than_set_keeps_everything_once() {
        let worlds = vec![
            world("Depot", 1, StarportClass::C, &[TradeCode::NavalBase]),
            world("High", 9, StarportClass::C, &[]),
        ];
        let selected = select_candidates(&worlds, 10);
        assert_eq!(selected.len(), 2);
    }
}
