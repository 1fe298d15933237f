use crate::problem::{order::NodeIdx, time_window::Minutes, vehicle::VehicleIdx};

/// Ordered walk of one vehicle, depot to depot, with the arrival minute at
/// every node of the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleWalk {
    vehicle: VehicleIdx,
    nodes: Vec<NodeIdx>,
    arrivals: Vec<Minutes>,
}

impl VehicleWalk {
    pub fn new(vehicle: VehicleIdx, nodes: Vec<NodeIdx>, arrivals: Vec<Minutes>) -> Self {
        VehicleWalk {
            vehicle,
            nodes,
            arrivals,
        }
    }

    /// A vehicle that leaves the depot and comes straight back.
    pub fn unused(vehicle: VehicleIdx, depot: NodeIdx) -> Self {
        VehicleWalk {
            vehicle,
            nodes: vec![depot, depot],
            arrivals: vec![0, 0],
        }
    }

    pub fn vehicle(&self) -> VehicleIdx {
        self.vehicle
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    pub fn arrivals(&self) -> &[Minutes] {
        &self.arrivals
    }

    /// Nodes between the start and end depot.
    pub fn visits(&self) -> &[NodeIdx] {
        if self.nodes.len() < 2 {
            return &[];
        }

        &self.nodes[1..self.nodes.len() - 1]
    }

    pub fn is_empty(&self) -> bool {
        self.visits().is_empty()
    }
}

/// Engine output: one walk per vehicle, in vehicle order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    walks: Vec<VehicleWalk>,
}

impl Assignment {
    pub fn new(walks: Vec<VehicleWalk>) -> Self {
        Assignment { walks }
    }

    pub fn walks(&self) -> &[VehicleWalk] {
        &self.walks
    }

    pub fn walk(&self, vehicle: VehicleIdx) -> Option<&VehicleWalk> {
        self.walks.get(vehicle.get())
    }

    pub fn visited_nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.walks.iter().flat_map(|walk| walk.visits().iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visits_exclude_depot_endpoints() {
        let walk = VehicleWalk::new(
            VehicleIdx::new(0),
            [0, 2, 1, 0].map(NodeIdx::new).to_vec(),
            vec![0, 10, 20, 30],
        );

        assert_eq!(walk.visits(), &[NodeIdx::new(2), NodeIdx::new(1)]);
        assert!(!walk.is_empty());
        assert!(VehicleWalk::unused(VehicleIdx::new(1), NodeIdx::new(0)).is_empty());
    }
}
