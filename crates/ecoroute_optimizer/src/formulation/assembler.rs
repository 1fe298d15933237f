use tracing::{info, instrument};

use crate::{
    formulation::{
        capacity_dimension::CapacityDimension, cost_model::CostModel,
        disjunction::priority_disjunctions, formulation::Formulation,
        time_dimension::TimeDimension,
    },
    problem::routing_problem::RoutingProblem,
    solver::solve_params::SolveParams,
};

/// Wires costs, dimensions and optional visits for `problem`. Only scales
/// units, no search happens here.
#[instrument(skip_all, level = "debug")]
pub fn assemble(problem: &RoutingProblem, params: &SolveParams) -> Formulation {
    let emission_factors = problem
        .vehicles()
        .iter()
        .map(|vehicle| vehicle.emission_factor())
        .collect::<Vec<_>>();

    let cost_model = CostModel::register(
        problem.matrices().distances(),
        &emission_factors,
        params.cost_weights(),
    );

    let capacity = CapacityDimension::new(problem.nodes(), problem.vehicles());

    let time = TimeDimension::new(
        problem.nodes(),
        problem.matrices().times().clone(),
        params.allow_late_deliveries,
        params.late_penalty_per_minute(),
    );

    let disjunctions = if params.allow_dropping_orders {
        priority_disjunctions(problem.nodes())
    } else {
        vec![]
    };

    info!(
        nodes = problem.num_nodes(),
        vehicles = problem.num_vehicles(),
        cost_metrics = cost_model.metrics().len(),
        disjunctions = disjunctions.len(),
        "Assembled routing formulation"
    );

    Formulation::new(
        RoutingProblem::DEPOT,
        cost_model,
        capacity,
        time,
        disjunctions,
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{order::NodeIdx, priority::Priority, vehicle::VehicleIdx},
        test_utils::{create_order, create_problem, create_vehicle},
    };

    use super::*;

    fn problem() -> RoutingProblem {
        create_problem(
            vec![
                create_order("a", 1.0, 2.0).with_priority(Priority::Urgent),
                create_order("b", 1.0, 4.1),
            ],
            vec![
                create_vehicle("electric", 10.0, 0.0),
                create_vehicle("diesel", 10.0, 250.0),
                create_vehicle("electric_2", 10.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_assemble_registers_metric_per_emission_factor() {
        let formulation = assemble(&problem(), &SolveParams::default());

        assert_eq!(formulation.num_nodes(), 3);
        assert_eq!(formulation.num_vehicles(), 3);
        assert_eq!(formulation.depot(), NodeIdx::new(0));
        assert_eq!(formulation.cost_model().metrics().len(), 2);
        assert_eq!(
            formulation.cost_model().metric_for(VehicleIdx::new(0)),
            formulation.cost_model().metric_for(VehicleIdx::new(2))
        );
    }

    #[test]
    fn test_assemble_registers_disjunctions_for_orders_only() {
        let formulation = assemble(&problem(), &SolveParams::default());

        assert_eq!(formulation.drop_penalty(NodeIdx::new(0)), None);
        assert_eq!(formulation.drop_penalty(NodeIdx::new(1)), Some(200_000));
        assert_eq!(formulation.drop_penalty(NodeIdx::new(2)), Some(10_000));
    }

    #[test]
    fn test_assemble_without_dropping() {
        let params = SolveParams {
            allow_dropping_orders: false,
            ..SolveParams::default()
        };
        let formulation = assemble(&problem(), &params);

        assert!(formulation.disjunctions().is_empty());
        assert_eq!(formulation.drop_penalty(NodeIdx::new(1)), None);
    }

    #[test]
    fn test_assemble_uses_time_matrix_as_transit() {
        let problem = problem();
        let formulation = assemble(&problem, &SolveParams::default());
        let (depot, far) = (NodeIdx::new(0), NodeIdx::new(2));

        // 4.1 km at 30 km/h is 8.2 minutes
        assert_eq!(formulation.time().transit(depot, far), 8);
        assert_eq!(
            formulation.time().transit(depot, far),
            problem.matrices().travel_time(depot, far)
        );
    }
}
