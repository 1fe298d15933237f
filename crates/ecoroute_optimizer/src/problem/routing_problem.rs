use ecoroute_matrix_providers::{
    cache::MatricesCache, distance_matrix_client::DistanceMatrixClient,
    distance_matrix_provider::DistanceMatrixProvider,
};
use tracing::{instrument, warn};

use crate::problem::{
    depot::with_depot,
    kmh::Kmh,
    location::Location,
    order::{NodeIdx, Order},
    travel_matrices::{TravelMatrices, build_time_matrix},
    vehicle::{Vehicle, VehicleIdx},
};

pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Nodes (depot at index 0), vehicles and the matrices over the nodes.
pub struct RoutingProblem {
    nodes: Vec<Order>,
    vehicles: Vec<Vehicle>,
    matrices: TravelMatrices,
}

impl RoutingProblem {
    pub const DEPOT: NodeIdx = NodeIdx::new(0);

    /// `nodes` must already start with the depot and match the matrices.
    /// Use [`RoutingProblemBuilder`] to inject the depot and derive matrices.
    pub(crate) fn new(nodes: Vec<Order>, vehicles: Vec<Vehicle>, matrices: TravelMatrices) -> Self {
        debug_assert!(nodes.first().is_some_and(Order::is_depot));
        debug_assert_eq!(nodes.len(), matrices.num_nodes());

        RoutingProblem {
            nodes,
            vehicles,
            matrices,
        }
    }

    pub fn nodes(&self) -> &[Order] {
        &self.nodes
    }

    pub fn node(&self, node: NodeIdx) -> &Order {
        &self.nodes[node]
    }

    pub fn orders(&self) -> impl Iterator<Item = (NodeIdx, &Order)> {
        self.nodes
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, order)| (NodeIdx::new(index), order))
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle: VehicleIdx) -> &Vehicle {
        &self.vehicles[vehicle]
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn matrices(&self) -> &TravelMatrices {
        &self.matrices
    }

    pub fn depot(&self) -> NodeIdx {
        Self::DEPOT
    }
}

#[derive(Default)]
pub struct RoutingProblemBuilder {
    orders: Vec<Order>,
    vehicles: Vec<Vehicle>,
    distance_matrix_provider: DistanceMatrixProvider,
    speed: Option<Kmh>,
}

impl RoutingProblemBuilder {
    pub fn set_orders(&mut self, orders: Vec<Order>) -> &mut RoutingProblemBuilder {
        self.orders = orders;
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut RoutingProblemBuilder {
        self.vehicles = vehicles;
        self
    }

    pub fn set_distance_matrix_provider(
        &mut self,
        provider: DistanceMatrixProvider,
    ) -> &mut RoutingProblemBuilder {
        self.distance_matrix_provider = provider;
        self
    }

    pub fn set_speed(&mut self, speed: Kmh) -> &mut RoutingProblemBuilder {
        self.speed = Some(speed);
        self
    }

    /// Skips invalid orders and vehicles, injects the depot and computes
    /// both matrices from scratch.
    #[instrument(skip_all, level = "debug")]
    pub fn build<C>(self, client: &DistanceMatrixClient<C>) -> RoutingProblem
    where
        C: MatricesCache,
    {
        let orders = self
            .orders
            .into_iter()
            .filter(|order| match order.validate() {
                Ok(()) => true,
                Err(reason) => {
                    warn!(id = order.id(), %reason, "Skipping order");
                    false
                }
            })
            .collect();
        let vehicles = self
            .vehicles
            .into_iter()
            .filter(|vehicle| match vehicle.validate() {
                Ok(()) => true,
                Err(reason) => {
                    warn!(id = vehicle.id(), %reason, "Skipping vehicle");
                    false
                }
            })
            .collect();

        let nodes = with_depot(orders);
        let locations = nodes
            .iter()
            .map(|order| *order.location())
            .collect::<Vec<Location>>();

        let distances = client.fetch_matrix(&locations, self.distance_matrix_provider);
        let times = build_time_matrix(
            &locations,
            self.speed.unwrap_or(Kmh::new(DEFAULT_SPEED_KMH)),
        );

        RoutingProblem::new(nodes, vehicles, TravelMatrices::new(distances, times))
    }
}
