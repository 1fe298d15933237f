use crate::problem::{
    order::{NodeIdx, Order},
    vehicle::{Vehicle, VehicleIdx},
};

/// Load dimension in demand units (`round(kg * SCALE_DEMAND)`). The depot
/// carries no demand, every vehicle is bounded by `[0, capacity]`.
#[derive(Debug, Clone)]
pub struct CapacityDimension {
    demands: Vec<i64>,
    vehicle_capacities: Vec<i64>,
}

impl CapacityDimension {
    pub fn new(nodes: &[Order], vehicles: &[Vehicle]) -> Self {
        let demands = nodes
            .iter()
            .enumerate()
            .map(|(index, order)| {
                if index == 0 {
                    0
                } else {
                    order.weight().to_units()
                }
            })
            .collect();

        let vehicle_capacities = vehicles
            .iter()
            .map(|vehicle| vehicle.capacity().to_units())
            .collect();

        CapacityDimension {
            demands,
            vehicle_capacities,
        }
    }

    #[inline(always)]
    pub fn demand(&self, node: NodeIdx) -> i64 {
        self.demands[node.get()]
    }

    #[inline(always)]
    pub fn capacity(&self, vehicle: VehicleIdx) -> i64 {
        self.vehicle_capacities[vehicle.get()]
    }

    pub fn demands(&self) -> &[i64] {
        &self.demands
    }

    pub fn vehicle_capacities(&self) -> &[i64] {
        &self.vehicle_capacities
    }

    /// Position of the first stop whose running load exceeds the vehicle capacity.
    pub fn first_overload(&self, vehicle: VehicleIdx, walk: &[NodeIdx]) -> Option<usize> {
        let capacity = self.capacity(vehicle);
        let mut load = 0;

        walk.iter().position(|&node| {
            load += self.demand(node);
            load > capacity
        })
    }
}
