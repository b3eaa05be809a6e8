//! Paths returned by the searches, and their reconstruction.

use std::collections::BTreeSet;

use super::search_state::SearchStates;
use super::{Graph, GraphError};
use crate::domain::{EdgeLabel, Stop};

/// One stop of a path and how it was reached.
#[derive(Debug, Clone)]
pub struct PathStep<'g> {
    pub stop: &'g Stop,
    /// Label of the edge from the previous stop; `None` for the origin
    pub arrived_by: Option<EdgeLabel>,
    /// Weight of that edge in meters; zero for the origin
    pub leg_distance: f64,
}

/// An ordered route from origin to destination, borrowed from its graph.
///
/// An empty path means no route was found.
#[derive(Debug, Clone, Default)]
pub struct Path<'g> {
    steps: Vec<PathStep<'g>>,
}

impl<'g> Path<'g> {
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    fn single(stop: &'g Stop) -> Self {
        Self {
            steps: vec![PathStep {
                stop,
                arrived_by: None,
                leg_distance: 0.0,
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep<'g>] {
        &self.steps
    }

    /// Stops from origin to destination.
    pub fn stops(&self) -> impl Iterator<Item = &'g Stop> + '_ {
        self.steps.iter().map(|s| s.stop)
    }

    /// Stop codes from origin to destination.
    pub fn codes(&self) -> Vec<&'g str> {
        self.stops().map(|s| s.code().as_str()).collect()
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Sum of the weights of the edges traversed, in meters.
    pub fn distance(&self) -> f64 {
        self.steps.iter().map(|s| s.leg_distance).sum()
    }

    /// Labels of the path's line runs, consecutive equal labels collapsed.
    pub fn line_runs(&self) -> Vec<&EdgeLabel> {
        let mut runs: Vec<&EdgeLabel> = Vec::new();
        for label in self.steps.iter().filter_map(|s| s.arrived_by.as_ref()) {
            if runs.last() != Some(&label) {
                runs.push(label);
            }
        }
        runs
    }

    /// Distinct fare zones of the stops on the path.
    pub fn fare_zones(&self) -> BTreeSet<&'g str> {
        self.stops().filter_map(|s| s.fare_zone()).collect()
    }
}

impl Graph {
    /// Follows predecessor links from `destination` back to `origin`.
    ///
    /// Predecessors are stored as codes and resolved through the graph's
    /// index, never through references held by the search state.
    pub(super) fn reconstruct_path(
        &self,
        states: &SearchStates,
        origin: usize,
        destination: usize,
    ) -> Result<Path<'_>, GraphError> {
        if origin == destination {
            return Ok(Path::single(&self.stops[origin]));
        }
        if !states.get(destination).is_visited() {
            return Ok(Path::empty());
        }

        let broken = || GraphError::BrokenPath(self.stops[destination].code().clone());
        let mut steps = Vec::new();
        let mut current = destination;

        while current != origin {
            // A chain longer than the graph has looped
            if steps.len() >= self.stops.len() {
                return Err(broken());
            }

            let state = states.get(current);
            steps.push(PathStep {
                stop: &self.stops[current],
                arrived_by: state.arrived_by().cloned(),
                leg_distance: state.leg_distance(),
            });

            let previous = state.previous().ok_or_else(broken)?;
            current = self.position(previous)?;
        }

        steps.push(PathStep {
            stop: &self.stops[origin],
            arrived_by: None,
            leg_distance: 0.0,
        });
        steps.reverse();

        Ok(Path { steps })
    }
}
