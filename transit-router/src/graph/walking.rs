//! Walking edges between nearby stops.
//!
//! Stops close enough to walk between get a `walk` edge in both directions,
//! enabling connections that don't appear on any line (and the only way on
//! or off the network for a synthetic origin or destination). The whole set
//! is rebuilt on every refresh; the cost is quadratic in the stop count.

use tracing::debug;

use super::{Graph, GraphError};
use crate::domain::{Edge, EdgeLabel, Stop};

impl Graph {
    /// Replaces every stop's walking edges with edges to all other stops
    /// within `threshold` meters.
    ///
    /// The threshold is remembered and reused when stops are later added or
    /// removed.
    pub fn connect_walk_stops(&mut self, threshold: f64) -> Result<(), GraphError> {
        check_threshold(threshold)?;

        self.walking_threshold = Some(threshold);
        self.refresh_walking_edges();
        Ok(())
    }

    /// Appends stops and connects walking edges at `threshold`, rebuilding
    /// them at most once.
    ///
    /// Nothing is rebuilt when the batch is empty and the threshold matches
    /// the last refresh. Fails without changing the graph on an invalid
    /// threshold or a clashing code.
    pub fn add_stops_within(
        &mut self,
        new_stops: Vec<Stop>,
        threshold: f64,
    ) -> Result<(), GraphError> {
        check_threshold(threshold)?;

        let added = self.insert_stops(new_stops)?;
        if added > 0 || self.walking_threshold != Some(threshold) {
            self.walking_threshold = Some(threshold);
            self.refresh_walking_edges();
        }
        Ok(())
    }

    /// Rebuilds walking edges at the remembered threshold.
    ///
    /// Before the first [`Graph::connect_walk_stops`] there is no threshold
    /// and the graph has no walking edges.
    pub(super) fn refresh_walking_edges(&mut self) {
        for stop in &mut self.stops {
            stop.clear_walking_edges();
        }

        let Some(threshold) = self.walking_threshold else {
            return;
        };

        let edges = walking_edges(&self.stops, threshold);
        let count = edges.len();
        for (from, edge) in edges {
            self.stops[from].add_walking_edge(edge);
        }
        self.walking_refreshes += 1;

        debug!(threshold, walking_edges = count, "Refreshed walking edges");
    }
}

fn check_threshold(threshold: f64) -> Result<(), GraphError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(GraphError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// Every ordered pair of distinct stops within `threshold`, as
/// (source position, edge).
fn walking_edges(stops: &[Stop], threshold: f64) -> Vec<(usize, Edge)> {
    let mut edges = Vec::new();

    for (i, from) in stops.iter().enumerate() {
        for to in stops {
            if from.code() == to.code() {
                continue;
            }
            let distance = from.distance_to(to);
            if distance <= threshold {
                edges.push((i, Edge::new(distance, to.code().clone(), EdgeLabel::Walk)));
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, ServiceCategory, StopCode};

    fn code(s: &str) -> StopCode {
        StopCode::parse(s).unwrap()
    }

    fn stop(c: &str, lat: f64, lon: f64) -> Stop {
        Stop::new(code(c), c, "1", Coordinate::new(lat, lon))
    }

    /// About 11 m per 0.0001 degree of latitude.
    fn row() -> Vec<Stop> {
        vec![
            stop("A", 41.0000, -8.0),
            stop("B", 41.0001, -8.0),
            stop("C", 41.0010, -8.0),
        ]
    }

    fn walking_targets(graph: &Graph, from: &str) -> Vec<String> {
        let mut targets: Vec<String> = graph
            .stop(&code(from))
            .unwrap()
            .walking_edges()
            .iter()
            .map(|e| e.target.to_string())
            .collect();
        targets.sort();
        targets
    }

    #[test]
    fn no_walking_edges_before_first_refresh() {
        let graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        assert_eq!(graph.walking_threshold(), None);
        assert_eq!(graph.walking_edge_count(), 0);
    }

    #[test]
    fn connects_pairs_within_threshold() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(50.0).unwrap();

        assert_eq!(walking_targets(&graph, "A"), vec!["B"]);
        assert_eq!(walking_targets(&graph, "B"), vec!["A"]);
        assert!(walking_targets(&graph, "C").is_empty());
        assert_eq!(graph.walking_threshold(), Some(50.0));

        let edge = &graph.stop(&code("A")).unwrap().walking_edges()[0];
        assert_eq!(edge.label, EdgeLabel::Walk);
        assert!(edge.weight > 10.0 && edge.weight < 12.0);
    }

    #[test]
    fn larger_threshold_connects_everything() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(500.0).unwrap();

        assert_eq!(graph.walking_edge_count(), 6);
        assert_eq!(walking_targets(&graph, "C"), vec!["A", "B"]);
    }

    #[test]
    fn refresh_replaces_previous_edges() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(500.0).unwrap();
        graph.connect_walk_stops(50.0).unwrap();

        assert_eq!(graph.walking_edge_count(), 2);
    }

    #[test]
    fn zero_threshold_connects_only_colocated_stops() {
        let mut stops = row();
        stops.push(stop("A2", 41.0000, -8.0));
        let mut graph = Graph::new(stops, &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(0.0).unwrap();

        assert_eq!(walking_targets(&graph, "A"), vec!["A2"]);
        assert_eq!(graph.walking_edge_count(), 2);
    }

    #[test]
    fn rejects_invalid_threshold() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();

        assert_eq!(
            graph.connect_walk_stops(-1.0).unwrap_err(),
            GraphError::InvalidThreshold(-1.0)
        );
        assert!(matches!(
            graph.connect_walk_stops(f64::NAN),
            Err(GraphError::InvalidThreshold(_))
        ));
        assert_eq!(graph.walking_threshold(), None);
    }

    #[test]
    fn added_stops_pick_up_walking_edges() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(50.0).unwrap();

        graph
            .add_stops(vec![Stop::synthetic(code("ORIGIN"), Coordinate::new(41.0011, -8.0))])
            .unwrap();

        assert_eq!(walking_targets(&graph, "ORIGIN"), vec!["C"]);
        assert_eq!(walking_targets(&graph, "C"), vec!["ORIGIN"]);
    }

    #[test]
    fn empty_batch_skips_refresh() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(50.0).unwrap();
        let refreshes = graph.walking_refreshes();

        graph.add_stops(Vec::new()).unwrap();
        graph.add_stops_within(Vec::new(), 50.0).unwrap();

        assert_eq!(graph.walking_refreshes(), refreshes);
        assert_eq!(graph.walking_edge_count(), 2);
    }

    #[test]
    fn add_within_new_threshold_refreshes_once() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(50.0).unwrap();
        let refreshes = graph.walking_refreshes();

        graph
            .add_stops_within(
                vec![Stop::synthetic(code("ORIGIN"), Coordinate::new(41.0011, -8.0))],
                500.0,
            )
            .unwrap();

        assert_eq!(graph.walking_refreshes(), refreshes + 1);
        assert_eq!(graph.walking_threshold(), Some(500.0));
        assert_eq!(walking_targets(&graph, "ORIGIN"), vec!["A", "B", "C"]);
    }

    #[test]
    fn add_within_invalid_threshold_leaves_graph_unchanged() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(50.0).unwrap();

        let err = graph
            .add_stops_within(
                vec![Stop::synthetic(code("ORIGIN"), Coordinate::new(41.0, -8.0))],
                f64::INFINITY,
            )
            .unwrap_err();

        assert_eq!(err, GraphError::InvalidThreshold(f64::INFINITY));
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.walking_threshold(), Some(50.0));
    }

    #[test]
    fn removal_keeps_remaining_walking_edges_without_rebuild() {
        let mut graph = Graph::new(row(), &[], ServiceCategory::Day).unwrap();
        graph.connect_walk_stops(500.0).unwrap();
        let refreshes = graph.walking_refreshes();

        graph.remove_stops(&[code("B")]).unwrap();

        assert_eq!(graph.walking_refreshes(), refreshes);
        assert_eq!(walking_targets(&graph, "A"), vec!["C"]);
        assert_eq!(walking_targets(&graph, "C"), vec!["A"]);
    }

    #[test]
    fn transit_edges_untouched_by_refresh() {
        let line = crate::domain::Line::new(
            crate::domain::LineCode::parse("200").unwrap(),
            "200",
            0,
            vec![code("A"), code("C")],
        );
        let mut graph = Graph::new(row(), &[line], ServiceCategory::Day).unwrap();
        let before = graph.stop(&code("A")).unwrap().transit_edges().to_vec();

        graph.connect_walk_stops(500.0).unwrap();
        graph.connect_walk_stops(5.0).unwrap();

        assert_eq!(graph.stop(&code("A")).unwrap().transit_edges(), before.as_slice());
    }
}
