use fxhash::FxHashSet;
use thiserror::Error;

use crate::{
    engine::assignment::{Assignment, VehicleWalk},
    formulation::{
        capacity_dimension::CapacityDimension,
        cost_model::{Cost, CostModel},
        disjunction::Disjunction,
        objective::ObjectiveBreakdown,
        time_dimension::TimeDimension,
    },
    problem::{order::NodeIdx, time_window::Minutes, vehicle::VehicleIdx},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentViolation {
    #[error("expected {expected} vehicle walks, got {actual}")]
    WalkCount { expected: usize, actual: usize },
    #[error("walk {position} belongs to vehicle {vehicle}")]
    WalkOrder { position: usize, vehicle: VehicleIdx },
    #[error("walk of vehicle {vehicle} does not start and end at the depot")]
    DepotEndpoints { vehicle: VehicleIdx },
    #[error("walk of vehicle {vehicle} returns to the depot mid-route")]
    DepotInsideWalk { vehicle: VehicleIdx },
    #[error("walk of vehicle {vehicle} visits unknown node {node}")]
    UnknownNode { vehicle: VehicleIdx, node: NodeIdx },
    #[error("node {node} is visited more than once")]
    DuplicateVisit { node: NodeIdx },
    #[error("walk of vehicle {vehicle} has {arrivals} arrival times for {nodes} nodes")]
    ArrivalCount {
        vehicle: VehicleIdx,
        nodes: usize,
        arrivals: usize,
    },
    #[error("mandatory node {node} is not visited")]
    MandatoryNodeSkipped { node: NodeIdx },
    #[error("vehicle {vehicle} exceeds its capacity at walk position {position}")]
    CapacityExceeded { vehicle: VehicleIdx, position: usize },
    #[error("vehicle {vehicle} arrives at node {node} at minute {arrival}, outside [{min}, {max}]")]
    ArrivalOutOfBounds {
        vehicle: VehicleIdx,
        node: NodeIdx,
        arrival: Minutes,
        min: Minutes,
        max: Minutes,
    },
    #[error("vehicle {vehicle} cannot reach node {node} by minute {arrival}")]
    TravelTimeViolated {
        vehicle: VehicleIdx,
        node: NodeIdx,
        arrival: Minutes,
    },
    #[error("vehicle {vehicle} waits {slack} minutes before node {node}")]
    SlackExceeded {
        vehicle: VehicleIdx,
        node: NodeIdx,
        slack: Minutes,
    },
}

/// Everything the routing engine needs: sizes, depot, per-vehicle arc
/// costs, the capacity and time dimensions and the optional visits.
#[derive(Debug, Clone)]
pub struct Formulation {
    num_nodes: usize,
    num_vehicles: usize,
    depot: NodeIdx,
    cost_model: CostModel,
    capacity: CapacityDimension,
    time: TimeDimension,
    disjunctions: Vec<Disjunction>,
    drop_penalties: Vec<Option<Cost>>,
}

impl Formulation {
    pub fn new(
        depot: NodeIdx,
        cost_model: CostModel,
        capacity: CapacityDimension,
        time: TimeDimension,
        disjunctions: Vec<Disjunction>,
    ) -> Self {
        let num_nodes = capacity.demands().len();
        let num_vehicles = capacity.vehicle_capacities().len();

        let mut drop_penalties = vec![None; num_nodes];
        for disjunction in &disjunctions {
            drop_penalties[disjunction.node.get()] = Some(disjunction.penalty);
        }

        Formulation {
            num_nodes,
            num_vehicles,
            depot,
            cost_model,
            capacity,
            time,
            disjunctions,
            drop_penalties,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    pub fn depot(&self) -> NodeIdx {
        self.depot
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    pub fn capacity(&self) -> &CapacityDimension {
        &self.capacity
    }

    pub fn time(&self) -> &TimeDimension {
        &self.time
    }

    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    /// Penalty for leaving `node` unvisited, `None` when the visit is mandatory.
    pub fn drop_penalty(&self, node: NodeIdx) -> Option<Cost> {
        self.drop_penalties[node.get()]
    }

    /// Non-depot nodes, in index order.
    pub fn customers(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        (0..self.num_nodes)
            .map(NodeIdx::new)
            .filter(move |&node| node != self.depot)
    }

    /// Non-depot nodes no walk visits.
    pub fn dropped_nodes(&self, assignment: &Assignment) -> Vec<NodeIdx> {
        let visited = assignment.visited_nodes().collect::<FxHashSet<_>>();
        self.customers()
            .filter(|node| !visited.contains(node))
            .collect()
    }

    pub fn evaluate_walk(&self, walk: &VehicleWalk) -> ObjectiveBreakdown {
        let vehicle = walk.vehicle();
        let arc_cost = walk
            .nodes()
            .windows(2)
            .map(|arc| self.cost_model.arc_cost(vehicle, arc[0], arc[1]))
            .sum::<Cost>();

        let (lateness_penalty, late_minutes) = walk
            .nodes()
            .iter()
            .zip(walk.arrivals())
            .fold((0, 0), |(penalty, minutes), (&node, &arrival)| {
                (
                    penalty + self.time.lateness_penalty(node, arrival),
                    minutes + self.time.late_minutes(node, arrival),
                )
            });

        ObjectiveBreakdown::new(arc_cost, lateness_penalty, 0, late_minutes)
    }

    /// Arc costs plus soft bound penalties plus the penalties of every
    /// dropped node.
    pub fn evaluate(&self, assignment: &Assignment) -> ObjectiveBreakdown {
        let routed = assignment
            .walks()
            .iter()
            .map(|walk| self.evaluate_walk(walk))
            .sum::<ObjectiveBreakdown>();

        let drop_penalty = self
            .dropped_nodes(assignment)
            .into_iter()
            .filter_map(|node| self.drop_penalty(node))
            .sum::<Cost>();

        routed + ObjectiveBreakdown::new(0, 0, drop_penalty, 0)
    }

    /// Shape checks: one walk per vehicle in order, depot endpoints, known
    /// nodes, single visits, one arrival per node, mandatory nodes visited.
    pub fn check_structure(&self, assignment: &Assignment) -> Result<(), AssignmentViolation> {
        if assignment.walks().len() != self.num_vehicles {
            return Err(AssignmentViolation::WalkCount {
                expected: self.num_vehicles,
                actual: assignment.walks().len(),
            });
        }

        let mut visited = FxHashSet::default();

        for (position, walk) in assignment.walks().iter().enumerate() {
            let vehicle = walk.vehicle();
            if vehicle.get() != position {
                return Err(AssignmentViolation::WalkOrder { position, vehicle });
            }

            let nodes = walk.nodes();
            if nodes.len() < 2 || nodes[0] != self.depot || nodes[nodes.len() - 1] != self.depot {
                return Err(AssignmentViolation::DepotEndpoints { vehicle });
            }

            if walk.arrivals().len() != nodes.len() {
                return Err(AssignmentViolation::ArrivalCount {
                    vehicle,
                    nodes: nodes.len(),
                    arrivals: walk.arrivals().len(),
                });
            }

            for &node in walk.visits() {
                if node.get() >= self.num_nodes {
                    return Err(AssignmentViolation::UnknownNode { vehicle, node });
                }
                if node == self.depot {
                    return Err(AssignmentViolation::DepotInsideWalk { vehicle });
                }
                if !visited.insert(node) {
                    return Err(AssignmentViolation::DuplicateVisit { node });
                }
            }
        }

        if let Some(node) = self
            .customers()
            .find(|node| !visited.contains(node) && self.drop_penalty(*node).is_none())
        {
            return Err(AssignmentViolation::MandatoryNodeSkipped { node });
        }

        Ok(())
    }

    /// Capacity prefixes, hard arrival bounds, travel times and slack.
    /// Expects a structurally valid assignment.
    pub fn check_hard_constraints(&self, assignment: &Assignment) -> Vec<AssignmentViolation> {
        let mut violations = vec![];

        for walk in assignment.walks() {
            let vehicle = walk.vehicle();

            if let Some(position) = self.capacity.first_overload(vehicle, walk.nodes()) {
                violations.push(AssignmentViolation::CapacityExceeded { vehicle, position });
            }

            let nodes = walk.nodes();
            let arrivals = walk.arrivals();

            for (position, (&node, &arrival)) in nodes.iter().zip(arrivals).enumerate() {
                let bounds = self.time.bounds(node);
                if !bounds.contains(arrival) {
                    violations.push(AssignmentViolation::ArrivalOutOfBounds {
                        vehicle,
                        node,
                        arrival,
                        min: bounds.min,
                        max: bounds.max,
                    });
                }

                if position == 0 {
                    continue;
                }

                let previous = nodes[position - 1];
                let slack = arrival - arrivals[position - 1] - self.time.transit(previous, node);
                if slack < 0 {
                    violations.push(AssignmentViolation::TravelTimeViolated {
                        vehicle,
                        node,
                        arrival,
                    });
                } else if slack > self.time.max_slack() {
                    violations.push(AssignmentViolation::SlackExceeded {
                        vehicle,
                        node,
                        slack,
                    });
                }
            }
        }

        violations
    }

    /// Structural checks first, then the first hard constraint violation.
    pub fn validate_assignment(&self, assignment: &Assignment) -> Result<(), AssignmentViolation> {
        self.check_structure(assignment)?;

        match self.check_hard_constraints(assignment).into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}
