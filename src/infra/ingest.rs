//! Typed ingest of raw catalog tables.
//!
//! The acquisition side delivers rows with the world profile, remarks,
//! bases and economic-extension fields still in catalog text form; this
//! module turns them into validated [`RawWorld`] records ready for
//! scoring. Malformed rows are dropped one by one, never the batch.

use serde::Deserialize;
use tracing::warn;

use crate::domain::entities::{
    EconomicExtension, HexCoord, RawWorld, StarportClass, TradeCode, TradeCodeSet,
};
use crate::domain::scoring::RecordError;
use crate::util::ehex;

/// One row of the raw world table, as delivered by the data source.
#[derive(Clone, Debug, Deserialize)]
pub struct RawWorldRecord {
    pub name: String,
    pub sector: String,
    /// Four-digit hex position, e.g. `0204`.
    pub hex: String,
    /// Universal world profile, e.g. `A788899-C`.
    pub uwp: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub bases: String,
    /// Economic extension in `(RLI±E)` form, e.g. `(D7E+5)`.
    #[serde(default)]
    pub economic_extension: Option<String>,
    #[serde(default)]
    pub allegiance: Option<String>,
}

fn parse_hex(field: &str) -> Result<HexCoord, RecordError> {
    let digits = field.trim();
    let bad = || RecordError::HexOutOfBounds(field.to_string());
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let column: u8 = digits[..2].parse().map_err(|_| bad())?;
    let row: u8 = digits[2..].parse().map_err(|_| bad())?;
    HexCoord::new(column, row).ok_or_else(bad)
}

fn parse_uwp(uwp: &str) -> Result<(StarportClass, u8), RecordError> {
    let chars: Vec<char> = uwp.trim().chars().collect();
    if chars.len() < 7 {
        return Err(RecordError::MalformedProfile(uwp.to_string()));
    }
    let starport =
        StarportClass::from_code(chars[0]).ok_or(RecordError::UnknownStarport(chars[0]))?;
    let population_exp =
        ehex::value(chars[4]).ok_or_else(|| RecordError::MalformedProfile(uwp.to_string()))?;
    Ok((starport, population_exp))
}

/// Parse `(RLI±E)`. A missing extension defaults upstream; a present but
/// malformed one rejects the record rather than silently flattening it.
fn parse_extension(text: &str) -> Result<EconomicExtension, RecordError> {
    let bad = || RecordError::MalformedExtension(text.to_string());
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(bad)?;
    let chars: Vec<char> = inner.chars().collect();
    if chars.len() < 4 {
        return Err(bad());
    }
    let resources = ehex::value(chars[0]).ok_or_else(bad)?;
    let labor = ehex::value(chars[1]).ok_or_else(bad)?;
    let infrastructure = ehex::value(chars[2]).ok_or_else(bad)?;
    let tail: String = chars[3..].iter().collect();
    let efficiency: i8 = tail.parse().map_err(|_| bad())?;
    Ok(EconomicExtension {
        resources,
        labor,
        infrastructure,
        efficiency,
    })
}

/// Fold remarks and bases into the trade-code set. Remarks carry plenty
/// of annotations outside the trade vocabulary; those are skipped. A
/// naval base (`N` in the bases column) joins the set as a tag.
fn parse_trade_codes(remarks: &str, bases: &str) -> TradeCodeSet {
    let mut codes = TradeCodeSet::new();
    for token in remarks.split_whitespace() {
        if let Some(code) = TradeCode::from_abbreviation(token) {
            codes.insert(code);
        }
    }
    if bases.contains('N') {
        codes.insert(TradeCode::NavalBase);
    }
    codes
}

/// Validate and type one row.
pub fn parse_record(record: &RawWorldRecord) -> Result<RawWorld, RecordError> {
    let hex = parse_hex(&record.hex)?;
    let (starport, population_exp) = parse_uwp(&record.uwp)?;
    let extension = match record.economic_extension.as_deref() {
        Some(text) if !text.trim().is_empty() => parse_extension(text)?,
        _ => EconomicExtension::default(),
    };
    Ok(RawWorld {
        name: record.name.clone(),
        sector: record.sector.clone(),
        hex,
        allegiance: record.allegiance.clone(),
        starport,
        population_exp,
        trade_codes: parse_trade_codes(&record.remarks, &record.bases),
        extension,
    })
}

/// Parsed batch: typed records plus a count of rejected rows.
#[derive(Debug)]
pub struct IngestOutcome {
    pub worlds: Vec<RawWorld>,
    pub dropped: usize,
}

/// Parse a batch of rows, optionally keeping only worlds whose
/// allegiance starts with `allegiance_prefix`. Rows outside the filter
/// are skipped silently; rows that fail validation are dropped with a
/// warning and counted.
pub fn ingest_records(
    records: &[RawWorldRecord],
    allegiance_prefix: Option<&str>,
) -> IngestOutcome {
    let mut worlds = Vec::with_capacity(records.len());
    let mut dropped = 0;
    for record in records {
        if let Some(prefix) = allegiance_prefix {
            let keep = record
                .allegiance
                .as_deref()
                .map(|a| a.starts_with(prefix))
                .unwrap_or(false);
            if !keep {
                continue;
            }
        }
        match parse_record(record) {
            Ok(world) => worlds.push(world),
            Err(err) => {
                dropped += 1;
                warn!("skipping record {} ({}): {err}", record.name, record.sector);
            }
        }
    }
    IngestOutcome { worlds, dropped }
}

/// Rows from a JSON array, the interchange form the acquisition tooling
/// hands over.
pub fn records_from_json(json: &str) -> Result<Vec<RawWorldRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, uwp: &str, extension: Option<&str>) -> RawWorldRecord {
        RawWorldRecord {
            name: name.to_string(),
            sector: "Trojan Reach".to_string(),
            hex: "2223".to_string(),
            uwp: uwp.to_string(),
            remarks: String::new(),
            bases: String::new(),
            economic_extension: extension.map(str::to_string),
            allegiance: None,
        }
    }

    #[test]
    fn parses_a_full_row() {
        let mut row = record("Drinax", "A435A55-E", Some("(D7E+5)"));
        row.remarks = "Hi In Cx".to_string();
        row.bases = "N".to_string();

        let world = parse_record(&row).unwrap();
        assert_eq!(world.hex.label(), "2223");
        assert_eq!(world.starport, StarportClass::A);
        assert_eq!(world.population_exp, 10);
        assert!(world.trade_codes.contains(TradeCode::HighPopulation));
        assert!(world.trade_codes.contains(TradeCode::Industrial));
        assert!(world.trade_codes.contains(TradeCode::NavalBase));
        assert_eq!(world.extension.resources, 13);
        assert_eq!(world.extension.labor, 7);
        assert_eq!(world.extension.infrastructure, 14);
        assert_eq!(world.extension.efficiency, 5);
    }

    #[test]
    fn unknown_remarks_tokens_are_ignored() {
        let mut row = record("Byrni", "C550697-8", None);
        row.remarks = "De Po O:2223 Sa".to_string();
        let world = parse_record(&row).unwrap();
        assert!(world.trade_codes.contains(TradeCode::Desert));
        assert!(world.trade_codes.contains(TradeCode::Poor));
        assert_eq!(world.trade_codes.iter().count(), 2);
    }

    #[test]
    fn missing_extension_defaults_to_zeroes() {
        let world = parse_record(&record("Exe", "B433764-A", None)).unwrap();
        assert_eq!(world.extension, EconomicExtension::default());
    }

    #[test]
    fn malformed_extension_rejects_the_record() {
        let err = parse_record(&record("Torpol", "B433764-A", Some("(D7+5)")));
        assert!(matches!(err, Err(RecordError::MalformedExtension(_))));
    }

    #[test]
    fn negative_efficiency_keeps_its_sign() {
        let world = parse_record(&record("Acis", "C543746-8", Some("(86B-2)"))).unwrap();
        assert_eq!(world.extension.efficiency, -2);
    }

    #[test]
    fn bad_uwp_and_hex_reject() {
        assert!(matches!(
            parse_record(&record("Short", "A43", None)),
            Err(RecordError::MalformedProfile(_))
        ));
        assert!(matches!(
            parse_record(&record("Weird", "Z435A55-E", None)),
            Err(RecordError::UnknownStarport('Z'))
        ));

        let mut row = record("Offgrid", "A435A55-E", None);
        row.hex = "3350".to_string();
        assert!(matches!(
            parse_record(&row),
            Err(RecordError::HexOutOfBounds(_))
        ));
    }

    #[test]
    fn batch_counts_drops_and_applies_allegiance_filter() {
        let mut imperial = record("Good", "A435A55-E", None);
        imperial.allegiance = Some("ImDd".to_string());
        let mut foreign = record("Outside", "B433764-A", None);
        foreign.allegiance = Some("AsSc".to_string());
        let mut broken = record("Broken", "??", None);
        broken.allegiance = Some("ImDd".to_string());

        let outcome = ingest_records(&[imperial, foreign, broken], Some("Im"));
        assert_eq!(outcome.worlds.len(), 1);
        assert_eq!(outcome.worlds[0].name, "Good");
        // The foreign row was filtered, not dropped; only the broken row counts.
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn records_parse_from_json() {
        let json = r#"[
            {
                "name": "Drinax",
                "sector": "Trojan Reach",
                "hex": "2223",
                "uwp": "A435A55-E",
                "remarks": "Hi",
                "economic_extension": "(D7E+5)",
                "allegiance": "Na"
            }
        ]"#;
        let rows = records_from_json(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Drinax");
        assert!(parse_record(&rows[0]).is_ok());
    }
}
