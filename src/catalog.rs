//! The immutable stop/route/bus catalog and its construction from the raw
//! tables.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use geo::{coord, Coord};
use itertools::Itertools;
use serde::Deserialize;

use crate::error::CatalogError;
use crate::records;

#[derive(Debug, PartialEq)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub position: Coord<f64>,
}

#[derive(Debug)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Polyline in traversal order; the simulator treats it as a closed loop.
    pub shape: Vec<Coord<f64>>,
    /// Stops in visiting order. Not necessarily a subsequence of `shape`.
    pub stops: Vec<Arc<Stop>>,
}

impl Route {
    pub fn stop_position(&self, stop_id: &str) -> Option<usize> {
        self.stops.iter().position(|stop| stop.id == stop_id)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusStatus {
    Moving,
    Stopped,
    Maintenance,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CrowdLevel {
    Available,
    Standing,
    Full,
}

/// One vehicle. Position, speed and ETA are rewritten every simulation tick
/// by producing a fresh value; everything else is fixed at catalog load.
#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    pub id: String,
    pub label: String,
    pub route_id: String,
    pub status: BusStatus,
    pub speed: f64,
    pub eta_to_next_stop: f64,
    pub crowd_level: CrowdLevel,
    pub position: Coord<f64>,
}

#[derive(Debug)]
pub struct Catalog {
    pub stops: Vec<Arc<Stop>>,
    pub routes: Vec<Arc<Route>>,
    /// Initial snapshot; the live one is owned by the scheduler.
    pub buses: Vec<Bus>,
}

impl Catalog {
    pub fn stop(&self, id: &str) -> Option<&Arc<Stop>> {
        self.stops.iter().find(|stop| stop.id == id)
    }

    pub fn route(&self, id: &str) -> Option<&Arc<Route>> {
        self.routes.iter().find(|route| route.id == id)
    }

    /// Position of a stop in catalog load order, the basis of the fare
    /// formula.
    pub fn stop_index(&self, id: &str) -> Option<usize> {
        self.stops.iter().position(|stop| stop.id == id)
    }
}

impl TryFrom<records::Dataset> for Catalog {
    type Error = CatalogError;

    fn try_from(dataset: records::Dataset) -> Result<Self, Self::Error> {
        let stops: Vec<Arc<Stop>> = dataset
            .stops
            .into_iter()
            .map(|record| {
                Arc::new(Stop {
                    id: record.stop_id,
                    name: record.stop_name,
                    position: coord! { x: record.stop_lon, y: record.stop_lat },
                })
            })
            .collect();
        check_unique("stops", stops.iter().map(|stop| stop.id.as_str()))?;

        let shapes: HashMap<String, Vec<Coord<f64>>> = dataset
            .shape_points
            .into_iter()
            .map(|point| (point.shape_id.to_owned(), point))
            .into_group_map()
            .into_iter()
            .map(|(shape_id, mut points)| {
                points.sort_by_key(|point| point.shape_pt_sequence);
                let polyline = points
                    .into_iter()
                    .map(|point| coord! { x: point.shape_pt_lon, y: point.shape_pt_lat })
                    .collect();
                (shape_id, polyline)
            })
            .collect();

        let mut stops_for_routes = dataset
            .route_stops
            .into_iter()
            .map(|row| (row.route_id.to_owned(), row))
            .into_group_map();

        let routes = dataset
            .routes
            .into_iter()
            .map(|record| {
                let shape = shapes.get(&record.shape_id).cloned().ok_or_else(|| {
                    CatalogError::UnknownShape {
                        shape_id: record.shape_id.to_owned(),
                        route_id: record.route_id.to_owned(),
                    }
                })?;

                let mut rows = stops_for_routes.remove(&record.route_id).unwrap_or_default();
                rows.sort_by_key(|row| row.stop_sequence);
                let route_stops = rows
                    .into_iter()
                    .map(|row| {
                        stops
                            .iter()
                            .find(|stop| stop.id == row.stop_id)
                            .cloned()
                            .ok_or_else(|| CatalogError::UnknownStop {
                                stop_id: row.stop_id,
                                route_id: record.route_id.to_owned(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Arc::new(Route {
                    id: record.route_id,
                    name: record.route_name,
                    color: record.route_color,
                    shape,
                    stops: route_stops,
                }))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        check_unique("routes", routes.iter().map(|route| route.id.as_str()))?;

        let buses = dataset
            .vehicles
            .into_iter()
            .map(|record| {
                if !routes.iter().any(|route| route.id == record.route_id) {
                    return Err(CatalogError::UnknownRoute {
                        route_id: record.route_id,
                        vehicle_id: record.vehicle_id,
                    });
                }
                Ok(Bus {
                    id: record.vehicle_id,
                    label: record.vehicle_label,
                    route_id: record.route_id,
                    status: record.status,
                    speed: record.speed,
                    eta_to_next_stop: record.eta_to_next_stop,
                    crowd_level: record.crowd_level,
                    position: coord! { x: record.vehicle_lon, y: record.vehicle_lat },
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        check_unique("vehicles", buses.iter().map(|bus| bus.id.as_str()))?;

        Ok(Self {
            stops,
            routes,
            buses,
        })
    }
}

fn check_unique<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                id: id.to_owned(),
                table,
            });
        }
    }
    Ok(())
}
