use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    time::{Duration, Instant},
};

use tracing::debug;

use crate::{
    engine::{
        assignment::{Assignment, VehicleWalk},
        routing_engine::{EngineError, EngineOutcome, RoutingEngine},
        schedule::schedule_walk,
        search_params::{LocalSearchMetaheuristic, SearchParams},
    },
    formulation::{cost_model::Cost, formulation::Formulation},
    problem::{order::NodeIdx, time_window::Minutes, vehicle::VehicleIdx},
};

/// Deterministic reference engine.
///
/// Routes are built vehicle by vehicle, always extending along the cheapest
/// feasible arc. Unless the metaheuristic is `None`, dropped nodes are then
/// reinserted by descending penalty, ejecting a single cheaper-to-drop node
/// when that lowers the objective, and routed nodes are relocated while the
/// objective improves. Both improvement settings run the same descent.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheapestArcEngine;

impl RoutingEngine for CheapestArcEngine {
    fn name(&self) -> &str {
        "cheapest_arc"
    }

    fn solve(
        &self,
        formulation: &Formulation,
        search: &SearchParams,
    ) -> Result<EngineOutcome, EngineError> {
        let budget = Duration::try_from(search.time_limit).map_err(|_| {
            EngineError::Fault(format!("invalid time limit {}", search.time_limit))
        })?;
        let deadline = Deadline::new(budget);

        let mut plan = Plan::new(formulation);
        plan.construct();

        debug!(
            unassigned = plan.unassigned().count(),
            "Built first solution"
        );

        if search.local_search_metaheuristic != LocalSearchMetaheuristic::None {
            plan.repair(&deadline);
            plan.relocate(&deadline);
            plan.repair(&deadline);
        }

        if let Some(node) = plan
            .unassigned()
            .find(|&node| formulation.drop_penalty(node).is_none())
        {
            debug!(%node, "Mandatory node could not be routed");
            return Ok(EngineOutcome::NoSolution);
        }

        Ok(EngineOutcome::Solved(plan.into_assignment()))
    }
}

struct Deadline(Option<Instant>);

impl Deadline {
    fn new(budget: Duration) -> Self {
        Deadline(Instant::now().checked_add(budget))
    }

    fn reached(&self) -> bool {
        self.0.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Route of one vehicle, kept feasible at all times.
#[derive(Clone)]
struct PlannedRoute {
    visits: Vec<NodeIdx>,
    arrivals: Vec<Minutes>,
    load: i64,
    cost: Cost,
}

struct Insertion {
    vehicle: VehicleIdx,
    position: usize,
    delta: Cost,
}

struct Ejection {
    vehicle: VehicleIdx,
    ejected: usize,
    insertion: usize,
    gain: Cost,
}

struct Plan<'a> {
    formulation: &'a Formulation,
    routes: Vec<PlannedRoute>,
    assigned: Vec<bool>,
}

impl<'a> Plan<'a> {
    fn new(formulation: &'a Formulation) -> Self {
        let depot = formulation.depot();
        let routes = (0..formulation.num_vehicles())
            .map(|vehicle| {
                let walk = VehicleWalk::unused(VehicleIdx::new(vehicle), depot);
                PlannedRoute {
                    visits: vec![],
                    arrivals: walk.arrivals().to_vec(),
                    load: 0,
                    cost: formulation.evaluate_walk(&walk).total,
                }
            })
            .collect();

        let mut assigned = vec![false; formulation.num_nodes()];
        assigned[depot.get()] = true;

        Plan {
            formulation,
            routes,
            assigned,
        }
    }

    fn unassigned(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.formulation
            .customers()
            .filter(|node| !self.assigned[node.get()])
    }

    /// Mandatory nodes rank above every optional one.
    fn routing_value(&self, node: NodeIdx) -> Cost {
        self.formulation.drop_penalty(node).unwrap_or(Cost::MAX)
    }

    fn worth_routing(&self, node: NodeIdx, delta: Cost) -> bool {
        self.formulation
            .drop_penalty(node)
            .is_none_or(|penalty| delta < penalty)
    }

    fn fits(&self, vehicle: VehicleIdx, load: i64) -> bool {
        load <= self.formulation.capacity().capacity(vehicle)
    }

    /// Schedule and cost of `visits` for `vehicle`, `None` if the time
    /// dimension cannot be satisfied.
    fn evaluate(&self, vehicle: VehicleIdx, visits: &[NodeIdx]) -> Option<(Vec<Minutes>, Cost)> {
        let depot = self.formulation.depot();
        let mut nodes = Vec::with_capacity(visits.len() + 2);
        nodes.push(depot);
        nodes.extend_from_slice(visits);
        nodes.push(depot);

        let arrivals = schedule_walk(self.formulation.time(), &nodes)?;
        let walk = VehicleWalk::new(vehicle, nodes, arrivals);
        let cost = self.formulation.evaluate_walk(&walk).total;

        Some((walk.arrivals().to_vec(), cost))
    }

    fn set_route(&mut self, vehicle: VehicleIdx, visits: Vec<NodeIdx>, arrivals: Vec<Minutes>, cost: Cost) {
        let capacity = self.formulation.capacity();
        let load = visits.iter().map(|&node| capacity.demand(node)).sum();

        self.routes[vehicle.get()] = PlannedRoute {
            visits,
            arrivals,
            load,
            cost,
        };
    }

    fn construct(&mut self) {
        for vehicle in (0..self.routes.len()).map(VehicleIdx::new) {
            while let Some((node, arrivals, cost)) = self.cheapest_extension(vehicle) {
                let mut visits = self.routes[vehicle.get()].visits.clone();
                visits.push(node);
                self.set_route(vehicle, visits, arrivals, cost);
                self.assigned[node.get()] = true;
            }
        }
    }

    fn cheapest_extension(&self, vehicle: VehicleIdx) -> Option<(NodeIdx, Vec<Minutes>, Cost)> {
        let route = &self.routes[vehicle.get()];
        let last = route
            .visits
            .last()
            .copied()
            .unwrap_or(self.formulation.depot());

        let mut candidate = route.visits.clone();
        let mut best: Option<(Cost, NodeIdx, Vec<Minutes>, Cost)> = None;

        for node in self.unassigned() {
            if !self.fits(vehicle, route.load + self.formulation.capacity().demand(node)) {
                continue;
            }

            candidate.push(node);
            let evaluated = self.evaluate(vehicle, &candidate);
            candidate.pop();

            let Some((arrivals, cost)) = evaluated else {
                continue;
            };
            if !self.worth_routing(node, cost - route.cost) {
                continue;
            }

            let arc = self.formulation.cost_model().arc_cost(vehicle, last, node);
            if best.as_ref().is_none_or(|(best_arc, ..)| arc < *best_arc) {
                best = Some((arc, node, arrivals, cost));
            }
        }

        best.map(|(_, node, arrivals, cost)| (node, arrivals, cost))
    }

    fn best_insertion(&self, node: NodeIdx) -> Option<Insertion> {
        let demand = self.formulation.capacity().demand(node);
        let mut best: Option<Insertion> = None;

        for (index, route) in self.routes.iter().enumerate() {
            let vehicle = VehicleIdx::new(index);
            if !self.fits(vehicle, route.load + demand) {
                continue;
            }

            for (position, cost) in self.insertion_costs(vehicle, &route.visits, node) {
                let delta = cost - route.cost;
                if best.as_ref().is_none_or(|best| delta < best.delta) {
                    best = Some(Insertion {
                        vehicle,
                        position,
                        delta,
                    });
                }
            }
        }

        best
    }

    /// Cost of every feasible position of `node` in `visits`.
    fn insertion_costs(
        &self,
        vehicle: VehicleIdx,
        visits: &[NodeIdx],
        node: NodeIdx,
    ) -> Vec<(usize, Cost)> {
        let mut candidate = Vec::with_capacity(visits.len() + 1);

        (0..=visits.len())
            .filter_map(|position| {
                candidate.clear();
                candidate.extend_from_slice(&visits[..position]);
                candidate.push(node);
                candidate.extend_from_slice(&visits[position..]);

                self.evaluate(vehicle, &candidate)
                    .map(|(_, cost)| (position, cost))
            })
            .collect()
    }

    /// Best single ejection of a node that is cheaper to drop than `node`.
    fn best_ejection(&self, node: NodeIdx) -> Option<Ejection> {
        let value = self.routing_value(node);
        let demand = self.formulation.capacity().demand(node);
        let mut best: Option<Ejection> = None;

        for (index, route) in self.routes.iter().enumerate() {
            let vehicle = VehicleIdx::new(index);

            for (ejected, &routed) in route.visits.iter().enumerate() {
                let Some(ejected_penalty) = self.formulation.drop_penalty(routed) else {
                    continue;
                };
                if ejected_penalty >= value {
                    continue;
                }

                let load = route.load - self.formulation.capacity().demand(routed) + demand;
                if !self.fits(vehicle, load) {
                    continue;
                }

                let mut remaining = route.visits.clone();
                remaining.remove(ejected);

                for (insertion, cost) in self.insertion_costs(vehicle, &remaining, node) {
                    let gain = value
                        .saturating_sub(ejected_penalty)
                        .saturating_sub(cost - route.cost);
                    if gain > 0 && best.as_ref().is_none_or(|best| gain > best.gain) {
                        best = Some(Ejection {
                            vehicle,
                            ejected,
                            insertion,
                            gain,
                        });
                    }
                }
            }
        }

        best
    }

    fn insert(&mut self, node: NodeIdx, vehicle: VehicleIdx, position: usize) {
        let mut visits = self.routes[vehicle.get()].visits.clone();
        visits.insert(position, node);

        if let Some((arrivals, cost)) = self.evaluate(vehicle, &visits) {
            self.set_route(vehicle, visits, arrivals, cost);
            self.assigned[node.get()] = true;
        }
    }

    /// Reinserts unassigned nodes, most expensive to drop first.
    fn repair(&mut self, deadline: &Deadline) {
        let mut queue = self
            .unassigned()
            .map(|node| (self.routing_value(node), Reverse(node)))
            .collect::<BinaryHeap<_>>();

        while let Some((_, Reverse(node))) = queue.pop() {
            if deadline.reached() {
                break;
            }
            if self.assigned[node.get()] {
                continue;
            }

            if let Some(insertion) = self.best_insertion(node)
                && self.worth_routing(node, insertion.delta)
            {
                self.insert(node, insertion.vehicle, insertion.position);
                continue;
            }

            if let Some(ejection) = self.best_ejection(node) {
                let route = &self.routes[ejection.vehicle.get()];
                let ejected = route.visits[ejection.ejected];
                let mut visits = route.visits.clone();
                visits.remove(ejection.ejected);
                visits.insert(ejection.insertion, node);

                if let Some((arrivals, cost)) = self.evaluate(ejection.vehicle, &visits) {
                    debug!(%node, %ejected, gain = ejection.gain, "Ejected node");
                    self.set_route(ejection.vehicle, visits, arrivals, cost);
                    self.assigned[node.get()] = true;
                    self.assigned[ejected.get()] = false;
                    queue.push((self.routing_value(ejected), Reverse(ejected)));
                }
            }
        }
    }

    /// Moves single nodes to their best position, or drops them, while the
    /// objective strictly improves.
    fn relocate(&mut self, deadline: &Deadline) {
        while !deadline.reached() && self.relocate_once() {}
    }

    fn relocate_once(&mut self) -> bool {
        for index in 0..self.routes.len() {
            let vehicle = VehicleIdx::new(index);

            for position in 0..self.routes[index].visits.len() {
                let original = self.routes[index].clone();
                let node = original.visits[position];

                let mut remaining = original.visits.clone();
                remaining.remove(position);
                let Some((arrivals, cost)) = self.evaluate(vehicle, &remaining) else {
                    continue;
                };
                let removal_delta = cost - original.cost;

                if let Some(penalty) = self.formulation.drop_penalty(node)
                    && removal_delta + penalty < 0
                {
                    self.set_route(vehicle, remaining, arrivals, cost);
                    self.assigned[node.get()] = false;
                    return true;
                }

                self.set_route(vehicle, remaining, arrivals, cost);
                if let Some(insertion) = self.best_insertion(node)
                    && removal_delta + insertion.delta < 0
                {
                    self.insert(node, insertion.vehicle, insertion.position);
                    return true;
                }

                self.routes[index] = original;
            }
        }

        false
    }

    fn into_assignment(self) -> Assignment {
        let depot = self.formulation.depot();
        let walks = self
            .routes
            .into_iter()
            .enumerate()
            .map(|(index, route)| {
                let mut nodes = Vec::with_capacity(route.visits.len() + 2);
                nodes.push(depot);
                nodes.extend(route.visits);
                nodes.push(depot);

                VehicleWalk::new(VehicleIdx::new(index), nodes, route.arrivals)
            })
            .collect();

        Assignment::new(walks)
    }
}
