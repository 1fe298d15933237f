use crate::problem::{
    order::{NodeIdx, Order},
    time_window::Minutes,
    travel_matrices::TimeMatrix,
};

/// Maximum waiting time at a node.
pub const MAX_SLACK_MINUTES: Minutes = 30;
/// Upper bound of every arrival time, one day.
pub const HORIZON_MINUTES: Minutes = 24 * 60;

/// Hard range of a node's arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumulBounds {
    pub min: Minutes,
    pub max: Minutes,
}

impl CumulBounds {
    pub const UNCONSTRAINED: CumulBounds = CumulBounds {
        min: 0,
        max: HORIZON_MINUTES,
    };

    pub fn contains(&self, arrival: Minutes) -> bool {
        arrival >= self.min && arrival <= self.max
    }
}

/// Arrivals after `bound` cost `penalty_per_minute` for every minute late.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftUpperBound {
    pub bound: Minutes,
    pub penalty_per_minute: i64,
}

impl SoftUpperBound {
    pub fn late_minutes(&self, arrival: Minutes) -> Minutes {
        (arrival - self.bound).max(0)
    }

    pub fn penalty(&self, arrival: Minutes) -> i64 {
        self.late_minutes(arrival) * self.penalty_per_minute
    }
}

/// Elapsed-time dimension over the time matrix.
#[derive(Debug, Clone)]
pub struct TimeDimension {
    transit: TimeMatrix,
    max_slack: Minutes,
    horizon: Minutes,
    bounds: Vec<CumulBounds>,
    soft_upper_bounds: Vec<Option<SoftUpperBound>>,
}

impl TimeDimension {
    /// Only nodes with both window bounds are constrained. With late
    /// deliveries allowed the window end becomes a soft bound.
    pub fn new(
        nodes: &[Order],
        transit: TimeMatrix,
        allow_late_deliveries: bool,
        late_penalty_per_minute: i64,
    ) -> Self {
        let mut bounds = vec![CumulBounds::UNCONSTRAINED; nodes.len()];
        let mut soft_upper_bounds = vec![None; nodes.len()];

        for (index, order) in nodes.iter().enumerate().skip(1) {
            let Some((start, end)) = order.window().bounds() else {
                continue;
            };

            if allow_late_deliveries {
                bounds[index].min = start;
                soft_upper_bounds[index] = Some(SoftUpperBound {
                    bound: end,
                    penalty_per_minute: late_penalty_per_minute,
                });
            } else {
                bounds[index] = CumulBounds {
                    min: start,
                    max: end,
                };
            }
        }

        TimeDimension {
            transit,
            max_slack: MAX_SLACK_MINUTES,
            horizon: HORIZON_MINUTES,
            bounds,
            soft_upper_bounds,
        }
    }

    #[inline(always)]
    pub fn transit(&self, from: NodeIdx, to: NodeIdx) -> Minutes {
        self.transit.get(from, to)
    }

    pub fn transit_matrix(&self) -> &TimeMatrix {
        &self.transit
    }

    pub fn max_slack(&self) -> Minutes {
        self.max_slack
    }

    pub fn horizon(&self) -> Minutes {
        self.horizon
    }

    #[inline(always)]
    pub fn bounds(&self, node: NodeIdx) -> CumulBounds {
        self.bounds[node.get()]
    }

    #[inline(always)]
    pub fn soft_upper_bound(&self, node: NodeIdx) -> Option<SoftUpperBound> {
        self.soft_upper_bounds[node.get()]
    }

    pub fn lateness_penalty(&self, node: NodeIdx, arrival: Minutes) -> i64 {
        self.soft_upper_bound(node)
            .map_or(0, |soft| soft.penalty(arrival))
    }

    pub fn late_minutes(&self, node: NodeIdx, arrival: Minutes) -> Minutes {
        self.soft_upper_bound(node)
            .map_or(0, |soft| soft.late_minutes(arrival))
    }
}
