use std::{
    iter,
    ops::{Add, AddAssign},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{formulation::cost_model::Cost, problem::time_window::Minutes};

/// Objective value of an assignment, split by source. All costs are in
/// engine units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectiveBreakdown {
    pub arc_cost: Cost,
    pub lateness_penalty: Cost,
    pub drop_penalty: Cost,
    pub total: Cost,
    pub late_minutes: Minutes,
}

impl ObjectiveBreakdown {
    pub const ZERO: ObjectiveBreakdown = ObjectiveBreakdown {
        arc_cost: 0,
        lateness_penalty: 0,
        drop_penalty: 0,
        total: 0,
        late_minutes: 0,
    };

    pub fn new(
        arc_cost: Cost,
        lateness_penalty: Cost,
        drop_penalty: Cost,
        late_minutes: Minutes,
    ) -> Self {
        ObjectiveBreakdown {
            arc_cost,
            lateness_penalty,
            drop_penalty,
            total: arc_cost + lateness_penalty + drop_penalty,
            late_minutes,
        }
    }
}

impl Add for ObjectiveBreakdown {
    type Output = ObjectiveBreakdown;

    fn add(self, other: ObjectiveBreakdown) -> ObjectiveBreakdown {
        ObjectiveBreakdown::new(
            self.arc_cost + other.arc_cost,
            self.lateness_penalty + other.lateness_penalty,
            self.drop_penalty + other.drop_penalty,
            self.late_minutes + other.late_minutes,
        )
    }
}

impl AddAssign for ObjectiveBreakdown {
    fn add_assign(&mut self, other: ObjectiveBreakdown) {
        *self = *self + other;
    }
}

impl iter::Sum for ObjectiveBreakdown {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ObjectiveBreakdown::ZERO, |acc, objective| acc + objective)
    }
}
