//! Journey search by stop name and the fare formula.

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::{Catalog, Route, Stop};

pub const BASE_FARE: u32 = 15;
pub const FARE_PER_STOP: u32 = 5;

/// Routes and buses serving a searched journey.
#[derive(Debug, Default)]
pub struct JourneyMatch {
    pub routes: Vec<Arc<Route>>,
    pub bus_count: usize,
    pub bus_labels: Vec<String>,
    /// Present when both endpoints resolve to catalog stops.
    pub fare: Option<u32>,
}

/// Case-insensitive journey search by stop display name.
///
/// Blank input or an unknown origin produces an empty match. A destination
/// name that resolves to no stop leaves only the origin constraint in place.
pub fn plan(catalog: &Catalog, from: &str, to: &str) -> JourneyMatch {
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return JourneyMatch::default();
    }
    let Some(origin) = stop_by_name(catalog, from) else {
        return JourneyMatch::default();
    };
    let destination = stop_by_name(catalog, to);

    let routes: Vec<Arc<Route>> = catalog
        .routes
        .iter()
        .filter(|route| {
            route.stop_position(&origin.id).is_some()
                && destination.is_none_or(|stop| route.stop_position(&stop.id).is_some())
        })
        .map(Arc::clone)
        .collect();

    let route_ids: HashSet<&str> = routes.iter().map(|route| route.id.as_str()).collect();
    let bus_labels: Vec<String> = catalog
        .buses
        .iter()
        .filter(|bus| route_ids.contains(bus.route_id.as_str()))
        .map(|bus| bus.label.to_owned())
        .collect();

    JourneyMatch {
        bus_count: bus_labels.len(),
        bus_labels,
        fare: destination.and_then(|stop| fare(catalog, &origin.id, &stop.id)),
        routes,
    }
}

fn stop_by_name<'a>(catalog: &'a Catalog, name: &str) -> Option<&'a Arc<Stop>> {
    catalog
        .stops
        .iter()
        .find(|stop| stop.name.eq_ignore_ascii_case(name))
}

/// Fare between two stops: a base fare plus a per-stop rate over the
/// distance between their catalog positions. No upper bound.
pub fn fare(catalog: &Catalog, from_id: &str, to_id: &str) -> Option<u32> {
    let from = catalog.stop_index(from_id)?;
    let to = catalog.stop_index(to_id)?;
    Some(BASE_FARE + FARE_PER_STOP * from.abs_diff(to) as u32)
}
