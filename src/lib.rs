//! Live-tracking core for a transit rider prototype.
//!
//! An immutable stop/route/bus catalog is loaded once from GTFS-flavoured
//! CSV tables, a simulator advances bus positions along route polylines on a
//! fixed cadence, and pure lookup functions derive the views a presentation
//! layer renders: arrival estimates per stop, journey matches by stop name,
//! and fares.

pub mod arrivals;
pub mod catalog;
pub mod error;
pub mod journey;
pub mod records;
pub mod scheduler;
pub mod sim;
