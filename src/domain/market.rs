//! Market model: commodity affinities and per-leg profit estimates.

use super::entities::{Commodity, TradeCode, TradeCodeSet, World};

/// Tunable pricing knobs. Defaults follow the standard speculative trade
/// tables; the only hard constraint downstream is that the distance
/// penalty never increases with distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarketParams {
    /// Divisor turning the destination population exponent into a demand
    /// factor, capped at 2.0.
    pub population_divisor: f64,
    /// Divisor turning destination resource output into a wealth factor,
    /// capped at 2.0.
    pub economy_divisor: f64,
    /// Price decay per parsec.
    pub distance_decay: f64,
    /// Floor of the distance penalty.
    pub distance_floor: f64,
    /// A leg must clear this per-ton profit to count as viable.
    pub min_leg_profit: f64,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            population_divisor: 6.0,
            economy_divisor: 500.0,
            distance_decay: 0.1,
            distance_floor: 0.5,
            min_leg_profit: 0.0,
        }
    }
}

/// Commodity classes a world with this code offers for export.
pub fn exports(code: TradeCode) -> &'static [Commodity] {
    use Commodity::*;
    match code {
        TradeCode::Agricultural => &[Food, Livestock, Organics],
        TradeCode::Industrial => &[ManufacturedGoods, Machinery, Electronics, Vehicles],
        TradeCode::Rich => &[LuxuryGoods, PreciousMetals, ArtObjects],
        TradeCode::HighPopulation => &[ManufacturedGoods, Electronics],
        TradeCode::Poor => &[RawMaterials, Ores, Labor],
        TradeCode::Desert => &[Minerals, Ores, Crystals],
        TradeCode::IceCapped => &[Water, Hydrogen],
        TradeCode::NonAligned => &[ExoticMaterials, Information],
        TradeCode::AsteroidBelt => &[Minerals, Ores, Crystals, RareElements],
        TradeCode::FluidOceans
        | TradeCode::NavalBase
        | TradeCode::Vacuum
        | TradeCode::WaterWorld => &[],
    }
}

/// Commodity classes a world with this code buys in.
pub fn imports(code: TradeCode) -> &'static [Commodity] {
    use Commodity::*;
    match code {
        TradeCode::Agricultural => &[ManufacturedGoods, Machinery, Electronics],
        TradeCode::Industrial => &[RawMaterials, Ores, Crystals, Food],
        TradeCode::Rich => &[LuxuryConsumables, RareMaterials],
        TradeCode::HighPopulation => &[Food, RawMaterials],
        TradeCode::Poor => &[Food, ManufacturedGoods, Medicine],
        TradeCode::Desert => &[Food, Water, LifeSupport],
        TradeCode::IceCapped => &[Food, ManufacturedGoods, HeatingEquipment],
        TradeCode::NonAligned => &[StandardGoods, Technology],
        TradeCode::AsteroidBelt => &[Food, ManufacturedGoods, LifeSupport],
        TradeCode::FluidOceans
        | TradeCode::NavalBase
        | TradeCode::Vacuum
        | TradeCode::WaterWorld => &[],
    }
}

fn sells(codes: &TradeCodeSet, commodity: Commodity) -> bool {
    codes.iter().any(|code| exports(code).contains(&commodity))
}

fn buys(codes: &TradeCodeSet, commodity: Commodity) -> bool {
    codes.iter().any(|code| imports(code).contains(&commodity))
}

/// Price factor for a starport score; better ports realize better prices
/// on both ends of a leg.
pub fn starport_factor(score: i32) -> f64 {
    match score {
        4 => 1.4,
        3 => 1.2,
        2 => 1.0,
        1 => 0.8,
        0 => 0.6,
        _ => 0.4,
    }
}

const PAIR_BONUSES: [(TradeCode, TradeCode, f64); 6] = [
    (TradeCode::Agricultural, TradeCode::HighPopulation, 1.5),
    (TradeCode::Industrial, TradeCode::Poor, 1.4),
    (TradeCode::Rich, TradeCode::HighPopulation, 1.6),
    (TradeCode::Desert, TradeCode::Agricultural, 1.3),
    (TradeCode::IceCapped, TradeCode::Desert, 1.4),
    (TradeCode::AsteroidBelt, TradeCode::Industrial, 1.3),
];

/// Uplift for notable exporter/importer pairings. When several rules
/// match, only the single best applies; bonuses never stack.
pub fn pair_bonus(origin: &TradeCodeSet, destination: &TradeCodeSet) -> f64 {
    PAIR_BONUSES
        .iter()
        .filter(|(from, to, _)| origin.contains(*from) && destination.contains(*to))
        .map(|(_, _, bonus)| *bonus)
        .fold(1.0, f64::max)
}

/// Estimated profit per ton hauling `commodity` from `origin` to
/// `destination` across `distance` parsecs.
///
/// `None` when no export/import link exists for the commodity, or when
/// the origin has no resource output to ship. Tonnage never enters here;
/// it scales circuit totals downstream.
pub fn profit_per_ton(
    origin: &World,
    destination: &World,
    commodity: Commodity,
    distance: u32,
    params: &MarketParams,
) -> Option<f64> {
    if origin.resource_output <= 0.0 {
        return None;
    }
    if !sells(&origin.trade_codes, commodity) || !buys(&destination.trade_codes, commodity) {
        return None;
    }

    let origin_port = starport_factor(origin.starport_score);
    let destination_port = starport_factor(destination.starport_score);
    let population = (destination.population_exp as f64 / params.population_divisor).min(2.0);
    let economy = (destination.resource_output / params.economy_divisor).min(2.0);
    let penalty =
        (1.0 - params.distance_decay * distance as f64).max(params.distance_floor);
    let bonus = pair_bonus(&origin.trade_codes, &destination.trade_codes);

    Some(
        commodity.base_value()
            * origin_port
            * destination_port
            * population
            * economy
            * penalty
            * bonus,
    )
}

/// The best-paying viable commodity for a directed leg.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegQuote {
    pub commodity: Commodity,
    pub profit_per_ton: f64,
}

/// Pick the single best commodity for a directed leg; a ship hauls one
/// commodity class per jump.
pub fn best_leg(
    origin: &World,
    destination: &World,
    distance: u32,
    params: &MarketParams,
) -> Option<LegQuote> {
    let mut best: Option<LegQuote> = None;
    for commodity in Commodity::ALL {
        let Some(profit) = profit_per_ton(origin, destination, commodity, distance, params)
        else {
            continue;
        };
        if profit <= params.min_leg_profit {
            continue;
        }
        match &best {
            Some(quote) if quote.profit_per_ton >= profit => {}
            _ => {
                best = Some(LegQuote {
                    commodity,
                    profit_per_ton: profit,
                })
            }
        }
    }
    best
}
