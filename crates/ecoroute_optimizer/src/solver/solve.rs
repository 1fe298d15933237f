use ecoroute_matrix_providers::{
    cache::{MatricesCache, NoCache},
    distance_matrix_client::DistanceMatrixClient,
    distance_matrix_provider::DistanceMatrixProvider,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    engine::{
        cheapest_arc::CheapestArcEngine,
        routing_engine::{EngineError, EngineOutcome, RoutingEngine},
    },
    formulation::{assembler::assemble, formulation::AssignmentViolation},
    problem::{
        order::Order,
        routing_problem::{RoutingProblem, RoutingProblemBuilder},
        vehicle::{Vehicle, sort_by_ev_priority},
    },
    solution::{
        csv_output::write_route_stops_to_path, extractor::extract_solution,
        output_error::OutputError, route::RoutingSolution,
    },
    solver::solve_params::SolveParams,
};

/// A solve that could not complete. Infeasibility is not an error, it is
/// reported as a `NO_SOLUTION` status or as dropped orders.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("no vehicles to route")]
    NoVehicles,
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("routing engine returned a malformed assignment: {0}")]
    MalformedAssignment(String),
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl From<AssignmentViolation> for SolveError {
    fn from(violation: AssignmentViolation) -> Self {
        SolveError::MalformedAssignment(violation.to_string())
    }
}

pub struct Solver<E = CheapestArcEngine, C = NoCache> {
    engine: E,
    client: DistanceMatrixClient<C>,
    params: SolveParams,
}

impl Solver {
    pub fn new(params: SolveParams) -> Self {
        Solver {
            engine: CheapestArcEngine,
            client: DistanceMatrixClient::default(),
            params,
        }
    }
}

impl<E, C> Solver<E, C>
where
    E: RoutingEngine,
    C: MatricesCache,
{
    pub fn with_engine(engine: E, client: DistanceMatrixClient<C>, params: SolveParams) -> Self {
        Solver {
            engine,
            client,
            params,
        }
    }

    pub fn params(&self) -> &SolveParams {
        &self.params
    }

    fn validate_params(&self) -> Result<(), SolveError> {
        let params = &self.params;

        if !params.speed.is_valid() {
            return Err(SolveError::InvalidParameter {
                name: "speed",
                reason: format!("{} km/h is not a positive speed", params.speed.value()),
            });
        }

        if params.time_limit.is_negative() {
            return Err(SolveError::InvalidParameter {
                name: "time_limit",
                reason: format!("{} is negative", params.time_limit),
            });
        }

        for (name, weight) in [
            ("w_distance", params.w_distance),
            ("w_emissions", params.w_emissions),
            ("w_on_time", params.w_on_time),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SolveError::InvalidParameter {
                    name,
                    reason: format!("{weight} is not a non-negative weight"),
                });
            }
        }

        Ok(())
    }

    /// Injects the depot and derives the matrices for one solve.
    pub fn build_problem(
        &self,
        orders: Vec<Order>,
        mut vehicles: Vec<Vehicle>,
        provider: DistanceMatrixProvider,
    ) -> RoutingProblem {
        if self.params.ev_priority {
            sort_by_ev_priority(&mut vehicles);
        }

        let mut builder = RoutingProblemBuilder::default();
        builder
            .set_orders(orders)
            .set_vehicles(vehicles)
            .set_distance_matrix_provider(provider)
            .set_speed(self.params.speed);

        builder.build(&self.client)
    }

    #[instrument(skip_all)]
    pub fn solve(
        &self,
        orders: Vec<Order>,
        vehicles: Vec<Vehicle>,
        provider: DistanceMatrixProvider,
    ) -> Result<RoutingSolution, SolveError> {
        if vehicles.is_empty() {
            return Err(SolveError::NoVehicles);
        }
        self.validate_params()?;

        let problem = self.build_problem(orders, vehicles, provider);
        self.solve_problem(&problem)
    }

    #[instrument(skip_all, fields(engine = self.engine.name()))]
    pub fn solve_problem(&self, problem: &RoutingProblem) -> Result<RoutingSolution, SolveError> {
        if problem.num_vehicles() == 0 {
            return Err(SolveError::NoVehicles);
        }
        self.validate_params()?;

        let formulation = assemble(problem, &self.params);
        let outcome = self
            .engine
            .solve(&formulation, &self.params.search_params())?;

        if let EngineOutcome::Solved(assignment) = &outcome {
            formulation.validate_assignment(assignment)?;
        }

        let mut solution = extract_solution(problem, &formulation, &outcome);

        if let Some(path) = &self.params.output_path {
            if solution.stops().next().is_some() {
                write_route_stops_to_path(path, solution.stops())?;
                info!(path = %path.display(), "Wrote route stops");
                solution.output_path = Some(path.clone());
            } else {
                warn!(path = %path.display(), "No stops to write");
            }
        }

        info!(status = %solution.status, "Solve finished");

        Ok(solution)
    }
}

/// One-shot solve with the built-in engine and no matrix cache.
pub fn solve_routes(
    orders: Vec<Order>,
    vehicles: Vec<Vehicle>,
    params: SolveParams,
    provider: DistanceMatrixProvider,
) -> Result<RoutingSolution, SolveError> {
    Solver::new(params).solve(orders, vehicles, provider)
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{kmh::Kmh, vehicle::FuelType},
        solution::route::SolveStatus,
        test_utils::{create_order, create_vehicle},
    };

    use super::*;

    #[test]
    fn test_solve_without_vehicles() {
        let result = solve_routes(
            vec![create_order("a", 1.0, 1.0)],
            vec![],
            SolveParams::default(),
            DistanceMatrixProvider::default(),
        );

        assert!(matches!(result, Err(SolveError::NoVehicles)));
    }

    #[test]
    fn test_invalid_speed_is_rejected() {
        let params = SolveParams {
            speed: Kmh::new(0.0),
            ..SolveParams::default()
        };

        let result = solve_routes(
            vec![create_order("a", 1.0, 1.0)],
            vec![create_vehicle("v", 10.0, 0.0)],
            params,
            DistanceMatrixProvider::default(),
        );

        assert!(matches!(
            result,
            Err(SolveError::InvalidParameter { name: "speed", .. })
        ));
    }

    #[test]
    fn test_solve_routes_all_orders() {
        let solution = solve_routes(
            vec![
                create_order("a", 1.0, 1.0),
                create_order("b", 2.0, 2.0),
            ],
            vec![create_vehicle("v", 10.0, 0.0)],
            SolveParams::default(),
            DistanceMatrixProvider::default(),
        )
        .unwrap();

        assert_eq!(solution.status, SolveStatus::Solved);
        assert!(solution.dropped_orders.is_empty());
        assert_eq!(
            solution
                .stops()
                .map(|stop| stop.order_id.as_str())
                .collect::<Vec<_>>(),
            vec!["depot", "a", "b"]
        );
        assert!(solution.output_path.is_none());
    }

    #[test]
    fn test_ev_priority_sorts_vehicles() {
        let solver = Solver::new(SolveParams::ev_priority());

        let problem = solver.build_problem(
            vec![create_order("a", 1.0, 1.0)],
            vec![
                create_vehicle("diesel", 10.0, 250.0).with_fuel_type(FuelType::Diesel),
                create_vehicle("electric", 10.0, 0.0).with_fuel_type(FuelType::Electric),
            ],
            DistanceMatrixProvider::default(),
        );

        assert_eq!(problem.vehicles()[0].id(), "electric");
    }

    #[test]
    fn test_writes_output_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes_solution.csv");
        let params = SolveParams {
            output_path: Some(path.clone()),
            ..SolveParams::default()
        };

        let solution = solve_routes(
            vec![create_order("a", 1.0, 1.0)],
            vec![create_vehicle("v", 10.0, 0.0)],
            params,
            DistanceMatrixProvider::default(),
        )
        .unwrap();

        assert_eq!(solution.output_path, Some(path.clone()));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 3);
    }
}
