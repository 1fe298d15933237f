use std::path::PathBuf;

use jiff::SignedDuration;

use crate::{
    engine::search_params::{
        DEFAULT_TIME_LIMIT, FirstSolutionStrategy, LocalSearchMetaheuristic, SearchParams,
    },
    formulation::cost_model::CostWeights,
    problem::{kmh::Kmh, routing_problem::DEFAULT_SPEED_KMH},
};

/// Emission weight of the low carbon preset.
pub const LOW_CARBON_EMISSION_WEIGHT: f64 = 2.0;

#[derive(Clone, Debug)]
pub struct SolveParams {
    /// Window ends become soft bounds penalized per late minute.
    pub allow_late_deliveries: bool,
    /// Orders may be left unvisited at their priority penalty.
    pub allow_dropping_orders: bool,
    /// Vehicles are considered electric first, then hybrid, diesel, gasoline.
    pub ev_priority: bool,

    pub w_distance: f64,
    pub w_emissions: f64,
    pub w_on_time: f64,

    pub speed: Kmh,

    pub time_limit: SignedDuration,
    pub first_solution_strategy: FirstSolutionStrategy,
    pub local_search_metaheuristic: LocalSearchMetaheuristic,

    /// Per-stop CSV target, nothing is written when unset.
    pub output_path: Option<PathBuf>,
}

impl Default for SolveParams {
    fn default() -> Self {
        SolveParams {
            allow_late_deliveries: true,
            allow_dropping_orders: true,
            ev_priority: false,
            w_distance: 1.0,
            w_emissions: 1.0,
            w_on_time: 1.0,
            speed: Kmh::new(DEFAULT_SPEED_KMH),
            time_limit: DEFAULT_TIME_LIMIT,
            first_solution_strategy: FirstSolutionStrategy::default(),
            local_search_metaheuristic: LocalSearchMetaheuristic::default(),
            output_path: None,
        }
    }
}

impl SolveParams {
    pub fn low_carbon() -> Self {
        SolveParams {
            w_emissions: LOW_CARBON_EMISSION_WEIGHT,
            ..SolveParams::default()
        }
    }

    pub fn ev_priority() -> Self {
        SolveParams {
            ev_priority: true,
            ..SolveParams::default()
        }
    }

    pub fn cost_weights(&self) -> CostWeights {
        CostWeights {
            w_distance: self.w_distance,
            w_emissions: self.w_emissions,
        }
    }

    /// Engine units per minute late.
    pub fn late_penalty_per_minute(&self) -> i64 {
        self.w_on_time.round() as i64
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            time_limit: self.time_limit,
            first_solution_strategy: self.first_solution_strategy,
            local_search_metaheuristic: self.local_search_metaheuristic,
        }
    }
}
