use ecoroute_matrix_providers::{
    distance_matrix::DistanceMatrix, distance_matrix_client::DistanceMatrixClient,
};

use crate::{
    engine::assignment::VehicleWalk,
    problem::{
        kilograms::Kilograms,
        location::Location,
        order::{DEPOT_LAT, DEPOT_LON, NodeIdx, Order},
        routing_problem::{RoutingProblem, RoutingProblemBuilder},
        time_window::Minutes,
        travel_matrices::{TimeMatrix, TravelMatrices},
        vehicle::{Vehicle, VehicleIdx},
    },
};

/// Kilometers per degree of latitude on the haversine sphere.
pub const KM_PER_DEGREE_LAT: f64 = 111.19492664455873;

pub fn north_of_depot(km: f64) -> Location {
    Location::from_lat_lon(DEPOT_LAT + km / KM_PER_DEGREE_LAT, DEPOT_LON)
}

pub fn create_order(id: &str, weight: f64, km_north: f64) -> Order {
    Order::new(id, Kilograms::new(weight), north_of_depot(km_north))
}

pub fn create_vehicle(id: &str, capacity: f64, emission_factor: f64) -> Vehicle {
    Vehicle::new(id, Kilograms::new(capacity), emission_factor)
}

pub fn create_problem(orders: Vec<Order>, vehicles: Vec<Vehicle>) -> RoutingProblem {
    let mut builder = RoutingProblemBuilder::default();
    builder.set_orders(orders).set_vehicles(vehicles);
    builder.build(&DistanceMatrixClient::default())
}

/// Problem over explicit matrices. `orders` must not contain the depot.
pub fn create_problem_with_matrices(
    orders: Vec<Order>,
    vehicles: Vec<Vehicle>,
    distances: Vec<Vec<f64>>,
    times: Vec<Vec<Minutes>>,
) -> RoutingProblem {
    let mut nodes = vec![Order::depot()];
    nodes.extend(orders);

    let matrices = TravelMatrices::new(
        DistanceMatrix::from_rows(distances).unwrap(),
        TimeMatrix::from_rows(times),
    );

    RoutingProblem::new(nodes, vehicles, matrices)
}

pub fn create_walk(vehicle: usize, nodes: &[usize], arrivals: &[Minutes]) -> VehicleWalk {
    VehicleWalk::new(
        VehicleIdx::new(vehicle),
        nodes.iter().copied().map(NodeIdx::new).collect(),
        arrivals.to_vec(),
    )
}
