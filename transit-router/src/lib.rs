//! Transit route planner server.
//!
//! A web application that answers: "how do I get from this stop, or this
//! point on the map, to that one?" over a bus network with separate day and
//! night services, bounded by line changes and fare zones.

pub mod dataset;
pub mod domain;
pub mod graph;
pub mod planner;
pub mod web;
