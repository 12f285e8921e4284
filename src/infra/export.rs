//! Flat tabular projection of ranked circuits.
//!
//! The reporting side persists these rows as CSV or similar; circuit
//! aggregates are referenced from leg rows by rank so the two tables
//! join cleanly.

use serde::Serialize;

use crate::domain::entities::Circuit;

/// Circuit-level summary row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CircuitRow {
    pub circuit_rank: usize,
    /// Full route including the closing return, e.g. `A -> B -> C -> A`.
    pub route: String,
    pub stop_count: usize,
    pub total_distance: u32,
    pub total_profit: f64,
    pub net_profit: f64,
    pub efficiency: f64,
}

/// One row per leg; aggregates live in the matching [`CircuitRow`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CircuitLegRow {
    pub circuit_rank: usize,
    pub leg_number: usize,
    pub origin: String,
    pub destination: String,
    pub distance: u32,
    /// Empty for deadhead legs.
    pub commodity: Option<String>,
    pub profit_per_ton: f64,
    pub leg_profit: f64,
}

fn route_label(circuit: &Circuit) -> String {
    let mut label = circuit.stops.join(" -> ");
    if let Some(first) = circuit.stops.first() {
        label.push_str(" -> ");
        label.push_str(first);
    }
    label
}

/// Summary rows in ranked order.
pub fn circuit_rows(circuits: &[Circuit]) -> Vec<CircuitRow> {
    circuits
        .iter()
        .enumerate()
        .map(|(index, circuit)| CircuitRow {
            circuit_rank: index + 1,
            route: route_label(circuit),
            stop_count: circuit.stops.len(),
            total_distance: circuit.total_distance,
            total_profit: circuit.total_profit,
            net_profit: circuit.net_profit,
            efficiency: circuit.efficiency,
        })
        .collect()
}

/// Leg rows across all circuits, in ranked then leg order.
pub fn leg_rows(circuits: &[Circuit], cargo_tons: u32) -> Vec<CircuitLegRow> {
    let mut rows = Vec::new();
    for (index, circuit) in circuits.iter().enumerate() {
        for (leg_index, leg) in circuit.legs.iter().enumerate() {
            rows.push(CircuitLegRow {
                circuit_rank: index + 1,
                leg_number: leg_index + 1,
                origin: leg.origin.clone(),
                destination: leg.destination.clone(),
                distance: leg.distance,
                commodity: leg.commodity.map(|c| c.label().to_string()),
                profit_per_ton: leg.profit_per_ton,
                leg_profit: leg.profit_per_ton * cargo_tons as f64,
            });
        }
    }
    rows
}
