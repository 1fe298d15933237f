use thiserror::Error;

use crate::{
    engine::{assignment::Assignment, search_params::SearchParams},
    formulation::formulation::Formulation,
};

/// The engine could not run. Searching and finding nothing is
/// [`EngineOutcome::NoSolution`], not an error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("routing engine unavailable: {0}")]
    Unavailable(String),
    #[error("routing engine fault: {0}")]
    Fault(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// Every hard constraint holds.
    Solved(Assignment),
    NoSolution,
}

/// Searches a formulation within the time budget of `search`.
pub trait RoutingEngine {
    fn name(&self) -> &str;

    fn solve(
        &self,
        formulation: &Formulation,
        search: &SearchParams,
    ) -> Result<EngineOutcome, EngineError>;
}

impl<E: RoutingEngine + ?Sized> RoutingEngine for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(
        &self,
        formulation: &Formulation,
        search: &SearchParams,
    ) -> Result<EngineOutcome, EngineError> {
        (**self).solve(formulation, search)
    }
}

impl<E: RoutingEngine + ?Sized> RoutingEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(
        &self,
        formulation: &Formulation,
        search: &SearchParams,
    ) -> Result<EngineOutcome, EngineError> {
        (**self).solve(formulation, search)
    }
}
