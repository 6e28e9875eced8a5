//! Route-constrained position simulation.

use std::sync::Arc;

use geo::Coord;
use rand::Rng;

use crate::catalog::{Bus, Route};

/// Per-axis tolerance when matching a bus position back onto its polyline.
const POINT_MATCH_TOLERANCE: f64 = 0.1;
/// Fraction of the remaining per-axis delta covered each tick.
const STEP_FRACTION: f64 = 0.02;
/// Per-axis uniform jitter bound, in degrees.
const JITTER: f64 = 0.000_25;
/// ETA decay per tick, in minutes.
const ETA_STEP: f64 = 0.1;
/// The ETA never drops below this.
pub const ETA_FLOOR: f64 = 0.1;
pub const SPEED_MIN: f64 = 20.0;
pub const SPEED_MAX: f64 = 60.0;
/// Symmetric per-tick speed perturbation bound.
const SPEED_JITTER: f64 = 1.0;

/// Advances every bus one tick along its route.
///
/// A pure transform of the input snapshot into a fresh one. A bus whose
/// `route_id` resolves to no route, or whose route has an empty polyline,
/// passes through unchanged.
pub fn advance(buses: &[Bus], routes: &[Arc<Route>]) -> Vec<Bus> {
    let mut rng = rand::rng();
    buses
        .iter()
        .map(|bus| advance_bus(bus, routes, &mut rng))
        .collect()
}

fn advance_bus<R: Rng>(bus: &Bus, routes: &[Arc<Route>], rng: &mut R) -> Bus {
    let Some(route) = routes.iter().find(|route| route.id == bus.route_id) else {
        return bus.clone();
    };
    if route.shape.is_empty() {
        return bus.clone();
    }

    // Recover the current polyline index by tolerance match; an unmatched
    // position restarts at the head of the shape. The shape is a closed
    // loop, so the successor of the last point is the first.
    let target = match current_index(bus.position, &route.shape) {
        Some(index) => route.shape[(index + 1) % route.shape.len()],
        None => route.shape[0],
    };

    let position = Coord {
        x: step_towards(bus.position.x, target.x, rng),
        y: step_towards(bus.position.y, target.y, rng),
    };

    Bus {
        position,
        eta_to_next_stop: (bus.eta_to_next_stop - ETA_STEP).max(ETA_FLOOR),
        speed: (bus.speed + rng.random_range(-SPEED_JITTER..=SPEED_JITTER))
            .clamp(SPEED_MIN, SPEED_MAX),
        ..bus.clone()
    }
}

/// First shape point within [`POINT_MATCH_TOLERANCE`] of `position` on both
/// axes.
fn current_index(position: Coord<f64>, shape: &[Coord<f64>]) -> Option<usize> {
    shape.iter().position(|point| {
        (point.x - position.x).abs() < POINT_MATCH_TOLERANCE
            && (point.y - position.y).abs() < POINT_MATCH_TOLERANCE
    })
}

fn step_towards<R: Rng>(from: f64, to: f64, rng: &mut R) -> f64 {
    from + (to - from) * STEP_FRACTION + rng.random_range(-JITTER..=JITTER)
}
