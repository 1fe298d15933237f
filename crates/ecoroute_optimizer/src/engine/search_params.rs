use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default engine time budget.
pub const DEFAULT_TIME_LIMIT: SignedDuration = SignedDuration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FirstSolutionStrategy {
    /// Extend each route from its last node along the cheapest feasible arc.
    #[default]
    PathCheapestArc,
    /// Let the engine choose.
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LocalSearchMetaheuristic {
    #[default]
    GuidedLocalSearch,
    GreedyDescent,
    /// Keep the first solution as is.
    None,
}

/// Search configuration handed to the engine together with the formulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub time_limit: SignedDuration,
    pub first_solution_strategy: FirstSolutionStrategy,
    pub local_search_metaheuristic: LocalSearchMetaheuristic,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            time_limit: DEFAULT_TIME_LIMIT,
            first_solution_strategy: FirstSolutionStrategy::default(),
            local_search_metaheuristic: LocalSearchMetaheuristic::default(),
        }
    }
}
