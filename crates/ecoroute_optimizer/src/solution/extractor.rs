use tracing::info;

use crate::{
    engine::{
        assignment::{Assignment, VehicleWalk},
        routing_engine::EngineOutcome,
    },
    formulation::formulation::Formulation,
    problem::{kilograms::Kilograms, routing_problem::RoutingProblem},
    solution::route::{RouteStop, RoutingSolution, SolveStatus, VehicleRoute},
};

/// Turns the engine outcome into vehicle routes. `NoSolution` yields an
/// empty solution with that status.
pub fn extract_solution(
    problem: &RoutingProblem,
    formulation: &Formulation,
    outcome: &EngineOutcome,
) -> RoutingSolution {
    let EngineOutcome::Solved(assignment) = outcome else {
        info!("No solution found");
        return RoutingSolution::no_solution();
    };

    let routes = extract_routes(problem, formulation, assignment);
    let dropped_orders = formulation
        .dropped_nodes(assignment)
        .into_iter()
        .map(|node| problem.node(node).id().to_owned())
        .collect::<Vec<_>>();
    let objective = formulation.evaluate(assignment);

    info!(
        routes = routes.len(),
        dropped = dropped_orders.len(),
        objective = objective.total,
        "Extracted solution"
    );

    RoutingSolution {
        status: SolveStatus::Solved,
        routes,
        dropped_orders,
        objective: Some(objective),
        output_path: None,
    }
}

/// Routes of the vehicles that visit at least one order.
pub fn extract_routes(
    problem: &RoutingProblem,
    formulation: &Formulation,
    assignment: &Assignment,
) -> Vec<VehicleRoute> {
    assignment
        .walks()
        .iter()
        .filter(|walk| !walk.is_empty())
        .map(|walk| extract_route(problem, formulation, walk))
        .collect()
}

fn extract_route(
    problem: &RoutingProblem,
    formulation: &Formulation,
    walk: &VehicleWalk,
) -> VehicleRoute {
    let vehicle = problem.vehicle(walk.vehicle());
    let capacity = formulation.capacity();
    let nodes = walk.nodes();

    let mut load = 0;
    let stops = nodes[..nodes.len() - 1]
        .iter()
        .zip(walk.arrivals())
        .enumerate()
        .map(|(stop_index, (&node, &arrival_minute))| {
            let order = problem.node(node);
            let demand = capacity.demand(node);
            load += demand;

            RouteStop {
                vehicle_id: vehicle.id().to_owned(),
                vehicle_index: walk.vehicle().get(),
                stop_index,
                order_id: order.id().to_owned(),
                demand_kg: Kilograms::from_units(demand).value(),
                cumulative_load_kg: Kilograms::from_units(load).value(),
                lat: order.location().lat(),
                lon: order.location().lon(),
                arrival_minute,
            }
        })
        .collect();

    let distance_km = nodes
        .windows(2)
        .map(|arc| problem.matrices().travel_distance(arc[0], arc[1]))
        .sum();

    VehicleRoute {
        vehicle_id: vehicle.id().to_owned(),
        vehicle_index: walk.vehicle().get(),
        stops,
        distance_km,
        return_minute: walk.arrivals().last().copied().unwrap_or_default(),
    }
}
