//! Derived arrival views over a bus snapshot.

use std::sync::Arc;

use itertools::Itertools;

use crate::catalog::{Bus, Route, Stop};

/// Minutes of display ETA per visited stop.
const MINUTES_PER_STOP: f64 = 2.0;

/// One bus due at a selected stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub bus: Bus,
    pub eta_minutes: f64,
}

/// Estimated arrivals at `stop_id`, soonest first (stable on ties).
///
/// Only the first route in catalog order containing the stop is considered;
/// an unknown stop id yields an empty list. The estimate is a placeholder:
/// later stops on the route get a larger base, a bus's speed nudges it down,
/// and it never drops below one minute.
pub fn estimate(stop_id: &str, routes: &[Arc<Route>], buses: &[Bus]) -> Vec<Arrival> {
    let Some((route, position)) = routes
        .iter()
        .find_map(|route| route.stop_position(stop_id).map(|position| (route, position)))
    else {
        return Vec::new();
    };

    let base = (position + 1) as f64 * MINUTES_PER_STOP;
    buses
        .iter()
        .filter(|bus| bus.route_id == route.id)
        .map(|bus| Arrival {
            eta_minutes: (base - bus.speed % 2.0).max(1.0),
            bus: bus.clone(),
        })
        .sorted_by(|a, b| a.eta_minutes.total_cmp(&b.eta_minutes))
        .collect()
}

/// Display ETA for every stop along a route, in visiting order.
pub fn stop_etas(route: &Route) -> Vec<(Arc<Stop>, f64)> {
    route
        .stops
        .iter()
        .enumerate()
        .map(|(index, stop)| (Arc::clone(stop), (index + 1) as f64 * MINUTES_PER_STOP))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BusStatus, CrowdLevel};
    use geo::coord;

    fn stop(id: &str, name: &str) -> Arc<Stop> {
        Arc::new(Stop {
            id: id.to_owned(),
            name: name.to_owned(),
            position: coord! { x: 91.7362, y: 26.1445 },
        })
    }

    fn route(id: &str, stops: Vec<Arc<Stop>>) -> Arc<Route> {
        Arc::new(Route {
            id: id.to_owned(),
            name: "Route A".to_owned(),
            color: "#E91E63".to_owned(),
            shape: Vec::new(),
            stops,
        })
    }

    fn bus(id: &str, route_id: &str, speed: f64) -> Bus {
        Bus {
            id: id.to_owned(),
            label: id.to_uppercase(),
            route_id: route_id.to_owned(),
            status: BusStatus::Moving,
            speed,
            eta_to_next_stop: 1.0,
            crowd_level: CrowdLevel::Available,
            position: coord! { x: 91.7450, y: 26.1500 },
        }
    }

    #[test]
    fn unknown_stop_yields_nothing() {
        let routes = vec![route("route-a", vec![stop("stop1", "Central Bus Station")])];
        let buses = vec![bus("bus-101", "route-a", 24.0)];
        assert!(estimate("stop9", &routes, &buses).is_empty());
    }

    #[test]
    fn stop_without_buses_yields_nothing() {
        let routes = vec![route("route-a", vec![stop("stop1", "Central Bus Station")])];
        let buses = vec![bus("bus-201", "route-b", 40.3)];
        assert!(estimate("stop1", &routes, &buses).is_empty());
    }

    #[test]
    fn estimates_sort_soonest_first() {
        // At stop index 0 the base is 2 minutes. 24.0 mod 2 leaves the full
        // base; 23.6 mod 2 = 1.6 pushes the estimate below the one-minute
        // floor. The slower-labelled bus therefore sorts first.
        let routes = vec![route("route-a", vec![stop("stop1", "Central Bus Station")])];
        let buses = vec![
            bus("bus-101", "route-a", 24.0),
            bus("bus-102", "route-a", 23.6),
        ];

        let arrivals = estimate("stop1", &routes, &buses);

        assert_eq!(arrivals.len(), 2);
        assert_eq!(arrivals[0].bus.id, "bus-102");
        assert!((arrivals[0].eta_minutes - 1.0).abs() < 1e-9);
        assert_eq!(arrivals[1].bus.id, "bus-101");
        assert!((arrivals[1].eta_minutes - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_input_order() {
        let routes = vec![route("route-a", vec![stop("stop1", "Central Bus Station")])];
        let buses = vec![
            bus("bus-101", "route-a", 24.0),
            bus("bus-102", "route-a", 26.0),
        ];

        let arrivals = estimate("stop1", &routes, &buses);

        assert_eq!(arrivals[0].bus.id, "bus-101");
        assert_eq!(arrivals[1].bus.id, "bus-102");
    }

    #[test]
    fn only_the_first_matching_route_is_considered() {
        let shared = stop("stop1", "Central Bus Station");
        let routes = vec![
            route("route-a", vec![Arc::clone(&shared)]),
            route("route-b", vec![stop("stop2", "Railway Station"), shared]),
        ];
        let buses = vec![bus("bus-201", "route-b", 40.3)];

        // stop1 is on both routes, but route-a wins and has no buses.
        assert!(estimate("stop1", &routes, &buses).is_empty());
    }

    #[test]
    fn later_stops_get_larger_estimates() {
        let stops = vec![
            stop("stop1", "Central Bus Station"),
            stop("stop2", "Railway Station"),
            stop("stop3", "GS Road Junction"),
        ];
        let route = route("route-a", stops);

        let etas = stop_etas(&route);

        assert_eq!(etas.len(), 3);
        assert_eq!(etas[0].0.id, "stop1");
        assert!((etas[0].1 - 2.0).abs() < 1e-9);
        assert!((etas[2].1 - 6.0).abs() < 1e-9);
    }
}
