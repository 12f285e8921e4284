use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Columns per sector on the hex grid.
pub const SECTOR_COLUMNS: u8 = 32;
/// Rows per sector on the hex grid.
pub const SECTOR_ROWS: u8 = 40;

/// Hex-grid position of a world inside its sector.
///
/// Columns run 1..=32 and rows 1..=40, matching the printed sector maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub column: u8,
    pub row: u8,
}

impl HexCoord {
    /// Build a coordinate, rejecting positions outside the sector grid.
    pub fn new(column: u8, row: u8) -> Option<Self> {
        if (1..=SECTOR_COLUMNS).contains(&column) && (1..=SECTOR_ROWS).contains(&row) {
            Some(Self { column, row })
        } else {
            None
        }
    }

    /// Four-digit catalog form, e.g. `0204`.
    pub fn label(&self) -> String {
        format!("{:02}{:02}", self.column, self.row)
    }
}

/// Starport quality class from the world profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarportClass {
    A,
    B,
    C,
    D,
    E,
    X,
}

impl StarportClass {
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'X' => Some(Self::X),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::X => 'X',
        }
    }

    /// Ordinal capability score. Class X (no port at all) sits below E.
    pub fn score(&self) -> i32 {
        match self {
            Self::A => 4,
            Self::B => 3,
            Self::C => 2,
            Self::D => 1,
            Self::E => 0,
            Self::X => -1,
        }
    }
}

/// Economic classification tags from the catalog remarks column.
///
/// Only tags that drive trade behavior are modeled; other remarks
/// annotations are ignored at ingest. Naval bases come from the bases
/// column but share the tag set because they mark strategic hubs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeCode {
    Agricultural,
    AsteroidBelt,
    Desert,
    FluidOceans,
    HighPopulation,
    IceCapped,
    Industrial,
    NavalBase,
    NonAligned,
    Poor,
    Rich,
    Vacuum,
    WaterWorld,
}

impl TradeCode {
    pub const ALL: [TradeCode; 13] = [
        TradeCode::Agricultural,
        TradeCode::AsteroidBelt,
        TradeCode::Desert,
        TradeCode::FluidOceans,
        TradeCode::HighPopulation,
        TradeCode::IceCapped,
        TradeCode::Industrial,
        TradeCode::NavalBase,
        TradeCode::NonAligned,
        TradeCode::Poor,
        TradeCode::Rich,
        TradeCode::Vacuum,
        TradeCode::WaterWorld,
    ];

    /// Catalog abbreviation.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            TradeCode::Agricultural => "Ag",
            TradeCode::AsteroidBelt => "As",
            TradeCode::Desert => "De",
            TradeCode::FluidOceans => "Fl",
            TradeCode::HighPopulation => "Hi",
            TradeCode::IceCapped => "Ic",
            TradeCode::Industrial => "In",
            TradeCode::NavalBase => "Nb",
            TradeCode::NonAligned => "Na",
            TradeCode::Poor => "Po",
            TradeCode::Rich => "Ri",
            TradeCode::Vacuum => "Va",
            TradeCode::WaterWorld => "Wa",
        }
    }

    pub fn from_abbreviation(code: &str) -> Option<Self> {
        TradeCode::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.abbreviation() == code)
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of trade codes, stored as a bitmask so affinity lookups are a
/// constant-time capability check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCodeSet(u16);

impl TradeCodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: TradeCode) {
        self.0 |= code.bit();
    }

    pub fn contains(&self, code: TradeCode) -> bool {
        self.0 & code.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = TradeCode> + '_ {
        TradeCode::ALL
            .iter()
            .copied()
            .filter(move |code| self.contains(*code))
    }
}

impl FromIterator<TradeCode> for TradeCodeSet {
    fn from_iter<I: IntoIterator<Item = TradeCode>>(iter: I) -> Self {
        let mut set = Self::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

/// Cargo commodity classes a ship can haul, one class per leg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Commodity {
    ArtObjects,
    Crystals,
    Electronics,
    ExoticMaterials,
    Food,
    HeatingEquipment,
    Hydrogen,
    Information,
    Labor,
    LifeSupport,
    Livestock,
    LuxuryConsumables,
    LuxuryGoods,
    Machinery,
    ManufacturedGoods,
    Medicine,
    Minerals,
    Ores,
    Organics,
    PreciousMetals,
    RareElements,
    RareMaterials,
    RawMaterials,
    StandardGoods,
    Technology,
    Vehicles,
    Water,
}

impl Commodity {
    pub const ALL: [Commodity; 27] = [
        Commodity::ArtObjects,
        Commodity::Crystals,
        Commodity::Electronics,
        Commodity::ExoticMaterials,
        Commodity::Food,
        Commodity::HeatingEquipment,
        Commodity::Hydrogen,
        Commodity::Information,
        Commodity::Labor,
        Commodity::LifeSupport,
        Commodity::Livestock,
        Commodity::LuxuryConsumables,
        Commodity::LuxuryGoods,
        Commodity::Machinery,
        Commodity::ManufacturedGoods,
        Commodity::Medicine,
        Commodity::Minerals,
        Commodity::Ores,
        Commodity::Organics,
        Commodity::PreciousMetals,
        Commodity::RareElements,
        Commodity::RareMaterials,
        Commodity::RawMaterials,
        Commodity::StandardGoods,
        Commodity::Technology,
        Commodity::Vehicles,
        Commodity::Water,
    ];

    /// Baseline market value in credits per ton before local factors.
    pub fn base_value(&self) -> f64 {
        match self {
            Commodity::LuxuryGoods => 1800.0,
            Commodity::PreciousMetals => 1700.0,
            Commodity::ArtObjects => 1600.0,
            Commodity::ExoticMaterials => 1550.0,
            Commodity::LuxuryConsumables => 1500.0,
            Commodity::RareMaterials => 1450.0,
            Commodity::Electronics | Commodity::Technology => 1400.0,
            Commodity::Medicine => 1350.0,
            Commodity::Machinery => 1300.0,
            Commodity::Vehicles => 1250.0,
            Commodity::ManufacturedGoods | Commodity::Information => 1200.0,
            Commodity::RareElements => 1150.0,
            Commodity::Crystals => 1100.0,
            Commodity::LifeSupport => 1000.0,
            Commodity::HeatingEquipment => 950.0,
            Commodity::Livestock | Commodity::StandardGoods => 900.0,
            Commodity::Organics => 850.0,
            Commodity::Food => 800.0,
            Commodity::Minerals => 700.0,
            Commodity::Ores => 650.0,
            Commodity::RawMaterials => 600.0,
            Commodity::Labor => 500.0,
            Commodity::Hydrogen => 450.0,
            Commodity::Water => 400.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Commodity::ArtObjects => "Art Objects",
            Commodity::Crystals => "Crystals",
            Commodity::Electronics => "Electronics",
            Commodity::ExoticMaterials => "Exotic Materials",
            Commodity::Food => "Food",
            Commodity::HeatingEquipment => "Heating Equipment",
            Commodity::Hydrogen => "Hydrogen",
            Commodity::Information => "Information",
            Commodity::Labor => "Labor",
            Commodity::LifeSupport => "Life Support",
            Commodity::Livestock => "Livestock",
            Commodity::LuxuryConsumables => "Luxury Consumables",
            Commodity::LuxuryGoods => "Luxury Goods",
            Commodity::Machinery => "Machinery",
            Commodity::ManufacturedGoods => "Manufactured Goods",
            Commodity::Medicine => "Medicine",
            Commodity::Minerals => "Minerals",
            Commodity::Ores => "Ores",
            Commodity::Organics => "Organics",
            Commodity::PreciousMetals => "Precious Metals",
            Commodity::RareElements => "Rare Elements",
            Commodity::RareMaterials => "Rare Materials",
            Commodity::RawMaterials => "Raw Materials",
            Commodity::StandardGoods => "Standard Goods",
            Commodity::Technology => "Technology",
            Commodity::Vehicles => "Vehicles",
            Commodity::Water => "Water",
        }
    }
}

/// Economic extension triplet plus efficiency modifier, `(RLI±E)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicExtension {
    pub resources: u8,
    pub labor: u8,
    pub infrastructure: u8,
    pub efficiency: i8,
}

/// A validated catalog record before economic scoring.
#[derive(Clone, Debug)]
pub struct RawWorld {
    pub name: String,
    pub sector: String,
    pub hex: HexCoord,
    pub allegiance: Option<String>,
    pub starport: StarportClass,
    pub population_exp: u8,
    pub trade_codes: TradeCodeSet,
    pub extension: EconomicExtension,
}

/// A scored world.
///
/// The derived fields (starport score, population, resource output) are a
/// pure function of the raw attributes, computed once at construction and
/// never mutated afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct World {
    pub name: String,
    pub sector: String,
    pub hex: HexCoord,
    pub allegiance: Option<String>,
    pub starport: StarportClass,
    pub population_exp: u8,
    pub trade_codes: TradeCodeSet,
    pub extension: EconomicExtension,
    pub starport_score: i32,
    pub population: u64,
    pub resource_output: f64,
}

/// Ship configuration for one search run. Immutable once validated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipConfig {
    /// Maximum parsecs a single leg may span, 1..=6.
    pub jump_range: u8,
    pub cargo_tons: u32,
    pub min_stops: u8,
    pub max_stops: u8,
    /// Number of top-ranked circuits to return.
    pub result_count: usize,
}

impl Default for ShipConfig {
    fn default() -> Self {
        // A jump-2 far trader with 64 tons of hold.
        Self {
            jump_range: 2,
            cargo_tons: 64,
            min_stops: 3,
            max_stops: 6,
            result_count: 10,
        }
    }
}

impl ShipConfig {
    /// Reject impossible configurations before any search work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jump_range == 0 || self.jump_range > 6 {
            return Err(ConfigError::JumpRange(self.jump_range));
        }
        if self.cargo_tons == 0 {
            return Err(ConfigError::CargoTons);
        }
        if self.min_stops < 3 {
            return Err(ConfigError::MinStops(self.min_stops));
        }
        if self.max_stops < self.min_stops {
            return Err(ConfigError::StopOrder {
                min: self.min_stops,
                max: self.max_stops,
            });
        }
        if self.result_count == 0 {
            return Err(ConfigError::ResultCount);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("jump range must be 1-6 parsecs, got {0}")]
    JumpRange(u8),
    #[error("cargo capacity must be at least one ton")]
    CargoTons,
    #[error("circuits need at least 3 stops, got min_stops {0}")]
    MinStops(u8),
    #[error("max_stops {max} is below min_stops {min}")]
    StopOrder { min: u8, max: u8 },
    #[error("result count must be at least 1")]
    ResultCount,
}

/// Recurring voyage costs charged against a circuit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub fuel_per_jump: f64,
    pub maintenance_per_circuit: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        // Standard figures for a 64-dton far trader.
        Self {
            fuel_per_jump: 1000.0,
            maintenance_per_circuit: 18_500.0,
        }
    }
}

/// One directed leg of a circuit.
#[derive(Clone, Debug, Serialize)]
pub struct TradeLeg {
    pub origin: String,
    pub destination: String,
    pub distance: u32,
    /// Best-paying commodity for this leg; `None` for a deadhead jump.
    pub commodity: Option<Commodity>,
    pub profit_per_ton: f64,
}

/// A closed profitable tour. Stops list the visit order; the final leg
/// returns to the first stop and no world repeats in between.
#[derive(Clone, Debug, Serialize)]
pub struct Circuit {
    pub stops: Vec<String>,
    pub legs: Vec<TradeLeg>,
    pub total_distance: u32,
    pub total_profit: f64,
    pub net_profit: f64,
    pub fuel_cost: f64,
    pub maintenance_cost: f64,
    /// Profit per parsec per ton.
    pub efficiency: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_coord_bounds() {
        assert!(HexCoord::new(1, 1).is_some());
        assert!(HexCoord::new(32, 40).is_some());
        assert!(HexCoord::new(0, 1).is_none());
        assert!(HexCoord::new(33, 1).is_none());
        assert!(HexCoord::new(1, 41).is_none());
    }

    #[test]
    fn hex_coord_label_zero_pads() {
        let hex = HexCoord::new(2, 4).unwrap();
        assert_eq!(hex.label(), "0204");
    }

    #[test]
    fn starport_scores_are_ordinal() {
        let scores: Vec<i32> = "ABCDEX"
            .chars()
            .map(|c| StarportClass::from_code(c).unwrap().score())
            .collect();
        assert_eq!(scores, vec![4, 3, 2, 1, 0, -1]);
        assert_eq!(StarportClass::from_code('F'), None);
    }

    #[test]
    fn trade_code_set_round_trip() {
        let set: TradeCodeSet = [TradeCode::Agricultural, TradeCode::Rich]
            .into_iter()
            .collect();
        assert!(set.contains(TradeCode::Agricultural));
        assert!(set.contains(TradeCode::Rich));
        assert!(!set.contains(TradeCode::Poor));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn trade_code_abbreviations_round_trip() {
        for code in TradeCode::ALL {
            assert_eq!(TradeCode::from_abbreviation(code.abbreviation()), Some(code));
        }
        assert_eq!(TradeCode::from_abbreviation("Zz"), None);
    }

    #[test]
    fn ship_config_validation() {
        assert!(ShipConfig::default().validate().is_ok());

        let zero_jump = ShipConfig {
            jump_range: 0,
            ..ShipConfig::default()
        };
        assert_eq!(zero_jump.validate(), Err(ConfigError::JumpRange(0)));

        let two_stop = ShipConfig {
            min_stops: 2,
            ..ShipConfig::default()
        };
        assert_eq!(two_stop.validate(), Err(ConfigError::MinStops(2)));

        let inverted = ShipConfig {
            min_stops: 5,
            max_stops: 4,
            ..ShipConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::StopOrder { min: 5, max: 4 })
        );

        let no_results = ShipConfig {
            result_count: 0,
            ..ShipConfig::default()
        };
        assert_eq!(no_results.validate(), Err(ConfigError::ResultCount));
    }
}
