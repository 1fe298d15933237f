use std::{fmt::Display, path::PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    formulation::objective::ObjectiveBreakdown,
    problem::{location::Location, time_window::Minutes},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SolveStatus {
    #[serde(rename = "OK")]
    Solved,
    #[serde(rename = "NO_SOLUTION")]
    NoSolution,
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Solved => write!(f, "OK"),
            SolveStatus::NoSolution => write!(f, "NO_SOLUTION"),
        }
    }
}

/// One visited node of a vehicle route. The start depot is stop 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteStop {
    pub vehicle_id: String,
    pub vehicle_index: usize,
    pub stop_index: usize,
    pub order_id: String,
    pub demand_kg: f64,
    /// Load on board after this stop, reset at every vehicle start.
    pub cumulative_load_kg: f64,
    pub lat: f64,
    pub lon: f64,
    /// Minute of day the vehicle reaches this stop.
    pub arrival_minute: Minutes,
}

impl RouteStop {
    pub fn location(&self) -> Location {
        Location::from_lat_lon(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VehicleRoute {
    pub vehicle_id: String,
    pub vehicle_index: usize,
    pub stops: Vec<RouteStop>,
    pub distance_km: f64,
    /// Minute the vehicle is back at the depot.
    pub return_minute: Minutes,
}

impl VehicleRoute {
    pub fn load_kg(&self) -> f64 {
        self.stops
            .last()
            .map_or(0.0, |stop| stop.cumulative_load_kg)
    }

    /// Stop coordinates in visiting order.
    pub fn locations(&self) -> Vec<Location> {
        self.stops.iter().map(RouteStop::location).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoutingSolution {
    pub status: SolveStatus,
    pub routes: Vec<VehicleRoute>,
    pub dropped_orders: Vec<String>,
    pub objective: Option<ObjectiveBreakdown>,
    pub output_path: Option<PathBuf>,
}

impl RoutingSolution {
    pub fn no_solution() -> Self {
        RoutingSolution {
            status: SolveStatus::NoSolution,
            routes: vec![],
            dropped_orders: vec![],
            objective: None,
            output_path: None,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Solved
    }

    /// Every stop of every route, vehicle by vehicle.
    pub fn stops(&self) -> impl Iterator<Item = &RouteStop> {
        self.routes.iter().flat_map(|route| route.stops.iter())
    }
}
