//! Closed-tour search over the filtered world set.
//!
//! Enumeration is partitioned by origin world; each origin's cycles are
//! independent, so origins run in parallel and merge through one final
//! deterministic sort. Cycles are walked depth-first without revisiting
//! intermediates, restricted to indices above the origin so every cyclic
//! vertex sequence is produced exactly once per traversal direction.
//! Both directions of a tour are distinct candidates: leg profits are
//! directional.

use rayon::prelude::*;
use tracing::{debug, info};

use super::entities::{Circuit, ConfigError, CostModel, ShipConfig, TradeLeg, World};
use super::hexgrid::{DistanceCache, SectorFrame};
use super::market::{best_leg, LegQuote, MarketParams};

/// Enumeration limits.
///
/// When the projected ordering count for an origin and cycle length
/// clears `permutation_cap`, that length degrades to a beam walk over
/// each hop's `beam_width` best-connected neighbors instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchParams {
    pub permutation_cap: u64,
    pub beam_width: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            permutation_cap: 10_000,
            beam_width: 4,
        }
    }
}

/// Ranked circuits plus bookkeeping about how they were found.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub circuits: Vec<Circuit>,
    /// True when any origin fell back to beam enumeration; the ranking is
    /// then approximate rather than an exhaustive optimum and any report
    /// built from it should say so.
    pub budget_exceeded: bool,
    /// Names of the origins that hit the cap.
    pub capped_origins: Vec<String>,
}

/// One configured search over a candidate world set.
pub struct CircuitSearch {
    pub config: ShipConfig,
    pub params: SearchParams,
    pub market: MarketParams,
    pub costs: CostModel,
}

struct SearchContext<'a> {
    worlds: &'a [World],
    distances: DistanceCache,
    /// Directed best-commodity quotes, row-major by (from, to).
    quotes: Vec<Option<LegQuote>>,
    /// Undirected adjacency, each list sorted by degree descending so a
    /// beam walk takes the best-connected neighbors first.
    neighbors: Vec<Vec<usize>>,
}

impl<'a> SearchContext<'a> {
    fn quote(&self, from: usize, to: usize) -> Option<LegQuote> {
        self.quotes[from * self.worlds.len() + to]
    }

    fn adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].contains(&b)
    }
}

impl CircuitSearch {
    pub fn new(config: ShipConfig) -> Self {
        Self {
            config,
            params: SearchParams::default(),
            market: MarketParams::default(),
            costs: CostModel::default(),
        }
    }

    /// Enumerate and rank closed tours over `worlds`.
    ///
    /// An empty result set is a normal outcome, not an error; many world
    /// sets simply hold no profitable circuit for a small ship.
    pub fn run(
        &self,
        worlds: &[World],
        frame: Option<&SectorFrame>,
    ) -> Result<SearchOutcome, ConfigError> {
        self.config.validate()?;

        let n = worlds.len();
        if n < self.config.min_stops as usize {
            return Ok(SearchOutcome::default());
        }

        let context = self.build_context(worlds, frame);
        let edge_count: usize = context.neighbors.iter().map(Vec::len).sum::<usize>() / 2;
        debug!("adjacency holds {edge_count} edges over {n} worlds");

        let per_origin: Vec<(Vec<Circuit>, bool)> = (0..n)
            .into_par_iter()
            .map(|origin| self.enumerate_origin(origin, &context))
            .collect();

        let mut outcome = SearchOutcome::default();
        for (origin, (found, capped)) in per_origin.into_iter().enumerate() {
            outcome.circuits.extend(found);
            if capped {
                outcome.budget_exceeded = true;
                outcome.capped_origins.push(worlds[origin].name.clone());
            }
        }

        rank(&mut outcome.circuits);
        outcome.circuits.truncate(self.config.result_count);
        info!(
            "circuit search found {} ranked circuits (budget exceeded: {})",
            outcome.circuits.len(),
            outcome.budget_exceeded
        );
        Ok(outcome)
    }

    fn build_context<'a>(
        &self,
        worlds: &'a [World],
        frame: Option<&SectorFrame>,
    ) -> SearchContext<'a> {
        let n = worlds.len();
        let jump = self.config.jump_range as u32;
        let distances = DistanceCache::build(worlds, frame);

        // Directed quotes for every in-range pair. Pairs in unrelated
        // coordinate frames have no distance and therefore no edge.
        let quotes: Vec<Option<LegQuote>> = (0..n * n)
            .into_par_iter()
            .map(|cell| {
                let (from, to) = (cell / n, cell % n);
                if from == to {
                    return None;
                }
                distances
                    .get(from, to)
                    .filter(|d| *d <= jump)
                    .and_then(|d| best_leg(&worlds[from], &worlds[to], d, &self.market))
            })
            .collect();

        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for a in 0..n {
            for b in (a + 1)..n {
                let in_range = distances.get(a, b).map(|d| d <= jump).unwrap_or(false);
                if in_range && (quotes[a * n + b].is_some() || quotes[b * n + a].is_some()) {
                    neighbors[a].push(b);
                    neighbors[b].push(a);
                }
            }
        }

        let degrees: Vec<usize> = neighbors.iter().map(Vec::len).collect();
        for list in &mut neighbors {
            list.sort_by(|a, b| degrees[*b].cmp(&degrees[*a]).then(a.cmp(b)));
        }

        SearchContext {
            worlds,
            distances,
            quotes,
            neighbors,
        }
    }

    fn enumerate_origin(&self, origin: usize, context: &SearchContext<'_>) -> (Vec<Circuit>, bool) {
        let n = context.worlds.len();
        let min = self.config.min_stops as usize;
        let max = (self.config.max_stops as usize).min(n);

        // Projected ordering count per cycle length, a falling factorial
        // over the intermediates still eligible past this origin.
        let eligible = (n - origin - 1) as u64;
        let mut exact_lengths = Vec::new();
        let mut capped_lengths = Vec::new();
        for stops in min..=max {
            if orderings(eligible, stops as u64 - 1) <= self.params.permutation_cap {
                exact_lengths.push(stops);
            } else {
                capped_lengths.push(stops);
            }
        }

        let mut circuits = Vec::new();
        let mut path = Vec::with_capacity(max);
        let mut visited = vec![false; n];
        path.push(origin);
        visited[origin] = true;

        if !exact_lengths.is_empty() {
            self.walk(
                context,
                origin,
                &mut path,
                &mut visited,
                &exact_lengths,
                None,
                &mut circuits,
            );
        }
        if !capped_lengths.is_empty() {
            self.walk(
                context,
                origin,
                &mut path,
                &mut visited,
                &capped_lengths,
                Some(self.params.beam_width),
                &mut circuits,
            );
        }

        (circuits, !capped_lengths.is_empty())
    }

    /// Depth-first cycle walk. `record_lengths` holds the stop counts to
    /// close at; `beam` restricts every expansion to the first so many
    /// eligible neighbors (already ordered best-connected first).
    #[allow(clippy::too_many_arguments)]
    fn walk(
        &self,
        context: &SearchContext<'_>,
        origin: usize,
        path: &mut Vec<usize>,
        visited: &mut [bool],
        record_lengths: &[usize],
        beam: Option<usize>,
        circuits: &mut Vec<Circuit>,
    ) {
        let current = path[path.len() - 1];
        let depth = path.len();

        if record_lengths.contains(&depth) && context.adjacent(current, origin) {
            if let Some(circuit) = self.assemble(context, path) {
                circuits.push(circuit);
            }
        }

        let deepest = record_lengths.iter().copied().max().unwrap_or(0);
        if depth >= deepest {
            return;
        }

        let mut taken = 0;
        for &next in &context.neighbors[current] {
            if next <= origin || visited[next] {
                continue;
            }
            if let Some(width) = beam {
                if taken >= width {
                    break;
                }
            }
            taken += 1;
            path.push(next);
            visited[next] = true;
            self.walk(context, origin, path, visited, record_lengths, beam, circuits);
            visited[next] = false;
            path.pop();
        }
    }

    /// Materialize a closed tour, or nothing when it fails an invariant.
    /// A tour either satisfies every invariant (closed, in-range legs,
    /// positive total profit) or is excluded entirely.
    fn assemble(&self, context: &SearchContext<'_>, path: &[usize]) -> Option<Circuit> {
        let stops = path.len();
        let cargo = self.config.cargo_tons as f64;
        let mut legs = Vec::with_capacity(stops);
        let mut total_distance = 0u32;
        let mut per_ton = 0.0;

        for position in 0..stops {
            let from = path[position];
            let to = path[(position + 1) % stops];
            let distance = context.distances.get(from, to)?;
            let quote = context.quote(from, to);
            legs.push(TradeLeg {
                origin: context.worlds[from].name.clone(),
                destination: context.worlds[to].name.clone(),
                distance,
                commodity: quote.map(|q| q.commodity),
                profit_per_ton: quote.map(|q| q.profit_per_ton).unwrap_or(0.0),
            });
            total_distance += distance;
            per_ton += quote.map(|q| q.profit_per_ton).unwrap_or(0.0);
        }

        let total_profit = per_ton * cargo;
        if total_profit <= 0.0 {
            return None;
        }

        let fuel_cost = stops as f64 * self.costs.fuel_per_jump;
        let maintenance_cost = self.costs.maintenance_per_circuit;
        let efficiency = if total_distance > 0 {
            total_profit / (total_distance as f64 * cargo)
        } else {
            0.0
        };

        Some(Circuit {
            stops: path
                .iter()
                .map(|&index| context.worlds[index].name.clone())
                .collect(),
            legs,
            total_distance,
            total_profit,
            net_profit: total_profit - fuel_cost - maintenance_cost,
            fuel_cost,
            maintenance_cost,
            efficiency,
        })
    }
}

/// Orderings of `picks` intermediates drawn from `pool`, saturating.
fn orderings(pool: u64, picks: u64) -> u64 {
    let mut total = 1u64;
    for offset in 0..picks {
        let Some(remaining) = pool.checked_sub(offset) else {
            return 0;
        };
        total = total.saturating_mul(remaining);
    }
    total
}

/// Profit descending, then efficiency, then fewer stops, then the stop
/// sequence itself so equal circuits order identically on every run.
fn rank(circuits: &mut [Circuit]) {
    circuits.sort_by(|a, b| {
        b.total_profit
            .partial_cmp(&a.total_profit)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.efficiency
                    .partial_cmp(&a.efficiency)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.stops.len().cmp(&b.stops.len()))
            .then_with(|| a.stops.cmp(&b.stops))
    });
}
