mod setup;

use ecoroute_matrix_providers::{
    distance_matrix_client::DistanceMatrixClient,
    distance_matrix_provider::DistanceMatrixProvider,
};
use ecoroute_optimizer::{
    engine::{
        assignment::{Assignment, VehicleWalk},
        routing_engine::{EngineError, EngineOutcome, RoutingEngine},
        search_params::SearchParams,
    },
    formulation::formulation::Formulation,
    problem::{order::NodeIdx, vehicle::VehicleIdx},
    solution::route::SolveStatus,
    solver::solve::{SolveError, Solver},
};
use setup::{order, params, vehicle};

/// Replays a fixed answer regardless of the formulation.
enum ScriptedEngine {
    Fault,
    NoSolution,
    Walks(Vec<(Vec<usize>, Vec<i64>)>),
}

impl RoutingEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn solve(
        &self,
        formulation: &Formulation,
        _search: &SearchParams,
    ) -> Result<EngineOutcome, EngineError> {
        match self {
            ScriptedEngine::Fault => Err(EngineError::Fault("scripted fault".to_owned())),
            ScriptedEngine::NoSolution => Ok(EngineOutcome::NoSolution),
            ScriptedEngine::Walks(walks) => {
                let mut walks = walks
                    .iter()
                    .enumerate()
                    .map(|(vehicle, (nodes, arrivals))| {
                        VehicleWalk::new(
                            VehicleIdx::new(vehicle),
                            nodes.iter().copied().map(NodeIdx::new).collect(),
                            arrivals.clone(),
                        )
                    })
                    .collect::<Vec<_>>();

                for vehicle in walks.len()..formulation.num_vehicles() {
                    walks.push(VehicleWalk::unused(VehicleIdx::new(vehicle), formulation.depot()));
                }

                Ok(EngineOutcome::Solved(Assignment::new(walks)))
            }
        }
    }
}

fn solve_with(engine: ScriptedEngine) -> Result<ecoroute_optimizer::solution::route::RoutingSolution, SolveError> {
    Solver::with_engine(engine, DistanceMatrixClient::default(), params()).solve(
        vec![order("a", 2.0, 1.02), order("b", 3.0, 2.04)],
        vec![vehicle("van", 8.0, 0.0)],
        DistanceMatrixProvider::default(),
    )
}

#[test]
fn engine_fault_is_surfaced() {
    let result = solve_with(ScriptedEngine::Fault);

    assert!(matches!(result, Err(SolveError::Engine(EngineError::Fault(_)))));
}

#[test]
fn engine_without_solution_reports_status() {
    let solution = solve_with(ScriptedEngine::NoSolution).unwrap();

    assert_eq!(solution.status, SolveStatus::NoSolution);
    assert!(solution.dropped_orders.is_empty());
}

#[test]
fn well_formed_assignment_is_extracted() {
    // 1.02 km and 2.04 km at 30 km/h are 2 and 4 minutes away
    let solution = solve_with(ScriptedEngine::Walks(vec![(vec![0, 1, 2, 0], vec![0, 2, 4, 8])])).unwrap();

    assert_eq!(solution.status, SolveStatus::Solved);
    let stops = solution
        .stops()
        .map(|stop| (stop.order_id.as_str(), stop.arrival_minute))
        .collect::<Vec<_>>();
    assert_eq!(stops, vec![("depot", 0), ("a", 2), ("b", 4)]);
}

#[test]
fn duplicate_visit_is_malformed() {
    let result = solve_with(ScriptedEngine::Walks(vec![(
        vec![0, 1, 1, 2, 0],
        vec![0, 2, 2, 4, 8],
    )]));

    assert!(matches!(result, Err(SolveError::MalformedAssignment(_))));
}

#[test]
fn walk_missing_end_depot_is_malformed() {
    let result = solve_with(ScriptedEngine::Walks(vec![(vec![0, 1, 2], vec![0, 2, 4])]));

    assert!(matches!(result, Err(SolveError::MalformedAssignment(_))));
}

#[test]
fn arrival_before_travel_time_is_malformed() {
    let result = solve_with(ScriptedEngine::Walks(vec![(vec![0, 2, 1, 0], vec![0, 1, 3, 6])]));

    assert!(matches!(result, Err(SolveError::MalformedAssignment(_))));
}
