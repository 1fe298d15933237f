#![allow(dead_code)]

use ecoroute_optimizer::{
    problem::{
        kilograms::Kilograms,
        location::Location,
        order::{DEPOT_LAT, DEPOT_LON, Order},
        vehicle::Vehicle,
    },
    solver::solve_params::SolveParams,
};
use jiff::SignedDuration;

/// Kilometers per degree of latitude on the haversine sphere.
pub const KM_PER_DEGREE_LAT: f64 = 111.19492664455873;

pub fn north_of_depot(km: f64) -> Location {
    Location::from_lat_lon(DEPOT_LAT + km / KM_PER_DEGREE_LAT, DEPOT_LON)
}

pub fn order(id: &str, weight: f64, km_north: f64) -> Order {
    Order::new(id, Kilograms::new(weight), north_of_depot(km_north))
}

pub fn vehicle(id: &str, capacity: f64, emission_factor: f64) -> Vehicle {
    Vehicle::new(id, Kilograms::new(capacity), emission_factor)
}

pub fn params() -> SolveParams {
    SolveParams {
        time_limit: SignedDuration::from_secs(2),
        ..SolveParams::default()
    }
}
