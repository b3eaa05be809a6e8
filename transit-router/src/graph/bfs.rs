//! Fewest-hops search.
//!
//! Plain breadth-first search over transit and walking edges together.
//! Weights are ignored when choosing the route; the returned path still
//! reports the distance of the edges it used.

use std::collections::VecDeque;

use tracing::debug;

use super::search_state::SearchStates;
use super::{Graph, GraphError, Path};
use crate::domain::StopCode;

impl Graph {
    /// Route from `origin` to `destination` with the fewest stop-to-stop hops.
    ///
    /// Returns an empty path when the destination is unreachable, and
    /// [`GraphError::StopNotFound`] when either code is not in the graph.
    pub fn fewest_hops(
        &self,
        origin: &StopCode,
        destination: &StopCode,
    ) -> Result<Path<'_>, GraphError> {
        let origin_idx = self.position(origin)?;
        let dest_idx = self.position(destination)?;

        let mut states = SearchStates::new(&self.stops);
        states.get_mut(origin_idx).set_for_origin();

        let mut frontier = VecDeque::from([origin_idx]);

        while let Some(current) = frontier.pop_front() {
            if states.get(dest_idx).is_visited() {
                break;
            }

            let stop = &self.stops[current];
            let base = states.get(current).distance();

            for edge in stop.edges() {
                let next = self.position(&edge.target)?;
                let state = states.get_mut(next);
                if state.is_visited() {
                    continue;
                }
                state.reach(stop.code(), edge, base + edge.weight);
                frontier.push_back(next);
            }
        }

        debug!(
            origin = %origin,
            destination = %destination,
            reached = states.visited_count(),
            found = states.get(dest_idx).is_visited(),
            "Fewest hops search complete"
        );

        self.reconstruct_path(&states, origin_idx, dest_idx)
    }
}
