//! Shortest path bounded by line runs and fare zones.
//!
//! Label-setting Dijkstra over transit and walking edges together. Each
//! tentative label also carries the line runs and fare zones of the path
//! that produced it; an edge is only relaxed when the extended path stays
//! within both bounds.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use tracing::{debug, trace};

use super::search_state::{SearchStates, extend_line_history};
use super::{Graph, GraphError, Path};
use crate::domain::{EdgeLabel, StopCode};

/// Upper bounds for a constrained search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConstraints {
    max_line_changes: usize,
    max_zones: usize,
}

impl SearchConstraints {
    /// Creates bounds, rejecting negative values.
    ///
    /// Zero is accepted: then only the origin itself satisfies the bound.
    pub fn new(max_line_changes: i64, max_zones: i64) -> Result<Self, GraphError> {
        let max_line_changes = usize::try_from(max_line_changes).map_err(|_| {
            GraphError::InvalidConstraint(format!(
                "max_line_changes must not be negative (got {max_line_changes})"
            ))
        })?;
        let max_zones = usize::try_from(max_zones).map_err(|_| {
            GraphError::InvalidConstraint(format!(
                "max_zones must not be negative (got {max_zones})"
            ))
        })?;

        Ok(Self {
            max_line_changes,
            max_zones,
        })
    }

    /// Creates bounds from values already known to be non-negative.
    pub fn bounded(max_line_changes: usize, max_zones: usize) -> Self {
        Self {
            max_line_changes,
            max_zones,
        }
    }

    /// No effective bound on either criterion.
    pub fn unbounded() -> Self {
        Self {
            max_line_changes: usize::MAX,
            max_zones: usize::MAX,
        }
    }

    /// Maximum number of distinct line runs (walking counts as a run).
    pub fn max_line_changes(&self) -> usize {
        self.max_line_changes
    }

    /// Maximum number of distinct fare zones on the path.
    pub fn max_zones(&self) -> usize {
        self.max_zones
    }
}

#[derive(Debug, Clone)]
struct QueueEntry {
    distance: f64,
    stop: usize,
    code: StopCode,
    label: EdgeLabel,
}

// Min-heap by distance, then stop code, then label (reversed for BinaryHeap)
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.code.cmp(&self.code))
            .then_with(|| other.label.cmp(&self.label))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Graph {
    /// Shortest route from `origin` to `destination` using at most
    /// `max_line_changes` line runs and `max_zones` fare zones.
    ///
    /// Returns an empty path when no route satisfies the bounds, and
    /// [`GraphError::StopNotFound`] when either code is not in the graph.
    pub fn constrained_shortest_path(
        &self,
        origin: &StopCode,
        destination: &StopCode,
        constraints: SearchConstraints,
    ) -> Result<Path<'_>, GraphError> {
        let origin_idx = self.position(origin)?;
        let dest_idx = self.position(destination)?;

        let mut states = SearchStates::new(&self.stops);
        states.get_mut(origin_idx).set_for_origin();

        let mut heap = BinaryHeap::new();
        self.relax_neighbours(origin_idx, None, &mut states, &mut heap, constraints)?;

        while let Some(entry) = heap.pop() {
            let state = states.get_mut(entry.stop);
            if state.is_visited() {
                continue;
            }
            state.visit();

            // Finalised labels never change, so the rest of the queue cannot
            // improve the destination.
            if entry.stop == dest_idx {
                break;
            }

            self.relax_neighbours(
                entry.stop,
                Some(&entry.label),
                &mut states,
                &mut heap,
                constraints,
            )?;
        }

        debug!(
            origin = %origin,
            destination = %destination,
            max_line_changes = constraints.max_line_changes,
            max_zones = constraints.max_zones,
            settled = states.visited_count(),
            found = states.get(dest_idx).is_visited(),
            "Constrained shortest path search complete"
        );

        self.reconstruct_path(&states, origin_idx, dest_idx)
    }

    fn relax_neighbours(
        &self,
        current: usize,
        arrived_by: Option<&EdgeLabel>,
        states: &mut SearchStates,
        heap: &mut BinaryHeap<QueueEntry>,
        constraints: SearchConstraints,
    ) -> Result<(), GraphError> {
        let stop = &self.stops[current];
        let state = states.get(current);
        let base = state.distance();

        let lines = match arrived_by {
            Some(label) => extend_line_history(state.lines(), label),
            None => state.lines().to_vec(),
        };
        let zones = with_zone(state.zones(), stop.fare_zone());

        for edge in stop.edges() {
            let next = self.position(&edge.target)?;
            let neighbour = states.get(next);
            let candidate = base + edge.weight;
            if neighbour.is_visited() || candidate >= neighbour.distance() {
                continue;
            }

            let next_lines = extend_line_history(&lines, &edge.label);
            if next_lines.len() > constraints.max_line_changes {
                trace!(
                    from = %stop.code(),
                    to = %edge.target,
                    lines = next_lines.len(),
                    "Line bound exceeded"
                );
                continue;
            }

            let next_zones = with_zone(&zones, self.stops[next].fare_zone());
            if next_zones.len() > constraints.max_zones {
                trace!(
                    from = %stop.code(),
                    to = %edge.target,
                    zones = next_zones.len(),
                    "Zone bound exceeded"
                );
                continue;
            }

            states
                .get_mut(next)
                .relax(stop.code(), edge, candidate, next_lines, next_zones);
            heap.push(QueueEntry {
                distance: candidate,
                stop: next,
                code: edge.target.clone(),
                label: edge.label.clone(),
            });
        }

        Ok(())
    }
}

fn with_zone(zones: &BTreeSet<String>, zone: Option<&str>) -> BTreeSet<String> {
    let mut zones = zones.clone();
    if let Some(zone) = zone {
        zones.insert(zone.to_string());
    }
    zones
}
