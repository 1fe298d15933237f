use ecoroute_matrix_providers::{
    distance_matrix::DistanceMatrix, distance_matrix_provider::DistanceMatrixProvider,
};
use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{
    engine::search_params::{FirstSolutionStrategy, LocalSearchMetaheuristic},
    problem::{
        kilograms::Kilograms,
        kmh::Kmh,
        location::Location,
        order::Order,
        priority::Priority,
        time_window::TimeWindow,
        vehicle::{FuelType, Vehicle},
    },
    solver::solve_params::SolveParams,
};

#[derive(Deserialize, JsonSchema)]
#[serde(rename = "RoutingRequest")]
pub struct JsonRoutingRequest {
    pub orders: Vec<JsonOrder>,
    pub vehicles: Vec<JsonVehicle>,
    pub params: Option<JsonSolveParams>,
    /// Precomputed distances in km between the depot and the orders, depot
    /// first. Derived from coordinates when missing.
    pub distance_matrix: Option<Vec<Vec<f64>>>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Order")]
pub struct JsonOrder {
    pub id: String,
    pub weight_kg: Option<f64>,
    pub priority: Option<Priority>,
    /// `HH:MM`
    pub window_start: Option<String>,
    /// `HH:MM`
    pub window_end: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl From<JsonOrder> for Order {
    fn from(value: JsonOrder) -> Self {
        Order::new(
            value.id,
            Kilograms::new(value.weight_kg.unwrap_or(0.0)),
            Location::from_lat_lon(value.lat, value.lon),
        )
        .with_priority(value.priority.unwrap_or_default())
        .with_window(TimeWindow::from_clock(
            value.window_start.as_deref(),
            value.window_end.as_deref(),
        ))
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub id: String,
    pub capacity_kg: f64,
    /// Grams of CO2 per km.
    pub emission_g_co2_per_km: f64,
    pub fuel_type: Option<FuelType>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl From<JsonVehicle> for Vehicle {
    fn from(value: JsonVehicle) -> Self {
        let vehicle = Vehicle::new(
            value.id,
            Kilograms::new(value.capacity_kg),
            value.emission_g_co2_per_km,
        )
        .with_fuel_type(value.fuel_type.unwrap_or_default());

        match value.kind {
            Some(kind) => vehicle.with_kind(kind),
            None => vehicle,
        }
    }
}

#[derive(Default, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JsonPreset {
    #[default]
    Default,
    LowCarbon,
    EvPriority,
}

#[derive(Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "SolveParams")]
pub struct JsonSolveParams {
    /// Applied first, the other fields override it.
    pub preset: Option<JsonPreset>,
    pub allow_late_deliveries: Option<bool>,
    pub allow_dropping_orders: Option<bool>,
    pub ev_priority: Option<bool>,
    pub w_distance: Option<f64>,
    pub w_emissions: Option<f64>,
    pub w_on_time: Option<f64>,
    pub speed_kmh: Option<f64>,
    pub time_limit: Option<SignedDuration>,
    pub first_solution_strategy: Option<FirstSolutionStrategy>,
    pub local_search_metaheuristic: Option<LocalSearchMetaheuristic>,
}

impl From<JsonSolveParams> for SolveParams {
    fn from(value: JsonSolveParams) -> Self {
        let mut params = match value.preset.unwrap_or_default() {
            JsonPreset::Default => SolveParams::default(),
            JsonPreset::LowCarbon => SolveParams::low_carbon(),
            JsonPreset::EvPriority => SolveParams::ev_priority(),
        };

        if let Some(allow_late_deliveries) = value.allow_late_deliveries {
            params.allow_late_deliveries = allow_late_deliveries;
        }
        if let Some(allow_dropping_orders) = value.allow_dropping_orders {
            params.allow_dropping_orders = allow_dropping_orders;
        }
        if let Some(ev_priority) = value.ev_priority {
            params.ev_priority = ev_priority;
        }
        if let Some(w_distance) = value.w_distance {
            params.w_distance = w_distance;
        }
        if let Some(w_emissions) = value.w_emissions {
            params.w_emissions = w_emissions;
        }
        if let Some(w_on_time) = value.w_on_time {
            params.w_on_time = w_on_time;
        }
        if let Some(speed_kmh) = value.speed_kmh {
            params.speed = Kmh::new(speed_kmh);
        }
        if let Some(time_limit) = value.time_limit {
            params.time_limit = time_limit;
        }
        if let Some(strategy) = value.first_solution_strategy {
            params.first_solution_strategy = strategy;
        }
        if let Some(metaheuristic) = value.local_search_metaheuristic {
            params.local_search_metaheuristic = metaheuristic;
        }

        params
    }
}

/// Everything a solve needs, taken from a JSON request.
pub struct RequestParts {
    pub orders: Vec<Order>,
    pub vehicles: Vec<Vehicle>,
    pub params: SolveParams,
    pub provider: DistanceMatrixProvider,
}

impl JsonRoutingRequest {
    /// Orders and vehicles that fail validation are skipped. A ragged
    /// distance matrix is an error.
    #[instrument(skip_all, level = "debug")]
    pub fn into_parts(self) -> Result<RequestParts, anyhow::Error> {
        let provider = match self.distance_matrix {
            Some(rows) => DistanceMatrixProvider::Precomputed {
                matrix: DistanceMatrix::from_rows(rows)?,
            },
            None => DistanceMatrixProvider::AsTheCrowFlies,
        };

        let orders = self
            .orders
            .into_iter()
            .map(Order::from)
            .filter(|order| match order.validate() {
                Ok(()) => true,
                Err(reason) => {
                    warn!(id = order.id(), %reason, "Skipping order");
                    false
                }
            })
            .collect();

        let vehicles = self
            .vehicles
            .into_iter()
            .map(Vehicle::from)
            .filter(|vehicle| match vehicle.validate() {
                Ok(()) => true,
                Err(reason) => {
                    warn!(id = vehicle.id(), %reason, "Skipping vehicle");
                    false
                }
            })
            .collect();

        Ok(RequestParts {
            orders,
            vehicles,
            params: self.params.map(SolveParams::from).unwrap_or_default(),
            provider,
        })
    }
}
