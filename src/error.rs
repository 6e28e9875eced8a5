use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("No such Stop {stop_id:?} on Route {route_id:?}")]
    UnknownStop { stop_id: String, route_id: String },

    #[error("No such shape {shape_id:?} for Route {route_id:?}")]
    UnknownShape { shape_id: String, route_id: String },

    #[error("No such Route {route_id:?} for vehicle {vehicle_id:?}")]
    UnknownRoute {
        route_id: String,
        vehicle_id: String,
    },

    #[error("Duplicate id {id:?} in the {table} table")]
    DuplicateId { id: String, table: &'static str },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
