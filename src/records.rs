//! Raw catalog tables as they appear on disk.
//!
//! Each struct mirrors one CSV file column-for-column; the domain model in
//! [`crate::catalog`] is built from these via `TryFrom`.

use std::path::Path;

use serde::Deserialize;

use crate::catalog::{BusStatus, CrowdLevel};
use crate::error::CatalogError;

#[derive(Deserialize, Debug)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

#[derive(Deserialize, Debug)]
pub struct Route {
    pub route_id: String,
    pub route_name: String,
    pub route_color: String,
    pub shape_id: String,
}

#[derive(Deserialize, Debug)]
pub struct ShapePoint {
    pub shape_id: String,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: u32,
}

#[derive(Deserialize, Debug)]
pub struct RouteStop {
    pub route_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
}

#[derive(Deserialize, Debug)]
pub struct Vehicle {
    pub vehicle_id: String,
    pub vehicle_label: String,
    pub route_id: String,
    pub status: BusStatus,
    pub speed: f64,
    pub eta_to_next_stop: f64,
    pub crowd_level: CrowdLevel,
    pub vehicle_lat: f64,
    pub vehicle_lon: f64,
}

#[derive(Debug)]
pub struct Dataset {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub shape_points: Vec<ShapePoint>,
    pub route_stops: Vec<RouteStop>,
    pub vehicles: Vec<Vehicle>,
}

fn deserialize_into<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let records = csv::Reader::from_path(path)?
        .deserialize()
        .collect::<Result<Vec<T>, _>>()?;
    Ok(records)
}

impl Dataset {
    pub fn from_dir(dir: &Path) -> Result<Self, CatalogError> {
        Ok(Self {
            stops: deserialize_into(&dir.join("stops.txt"))?,
            routes: deserialize_into(&dir.join("routes.txt"))?,
            shape_points: deserialize_into(&dir.join("shapes.txt"))?,
            route_stops: deserialize_into(&dir.join("route_stops.txt"))?,
            vehicles: deserialize_into(&dir.join("vehicles.txt"))?,
        })
    }
}
