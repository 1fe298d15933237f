use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{define_index_newtype, problem::kilograms::Kilograms};

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Electric,
    Hybrid,
    Diesel,
    Gasoline,
    #[default]
    Unknown,
}

impl FuelType {
    /// Rank used when electric vehicles should be considered first.
    pub fn ev_priority_rank(&self) -> u8 {
        match self {
            FuelType::Electric => 0,
            FuelType::Hybrid => 1,
            FuelType::Diesel => 2,
            FuelType::Gasoline => 3,
            FuelType::Unknown => 4,
        }
    }
}

impl From<&str> for FuelType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "electric" | "ev" => FuelType::Electric,
            "hybrid" => FuelType::Hybrid,
            "diesel" => FuelType::Diesel,
            "gasoline" | "petrol" => FuelType::Gasoline,
            _ => FuelType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: String,
    capacity: Kilograms,
    /// Grams of CO2 per km.
    emission_factor: f64,
    fuel_type: FuelType,
    kind: Option<String>,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, capacity: Kilograms, emission_factor: f64) -> Self {
        Vehicle {
            id: id.into(),
            capacity,
            emission_factor,
            fuel_type: FuelType::Unknown,
            kind: None,
        }
    }

    pub fn with_fuel_type(mut self, fuel_type: FuelType) -> Self {
        self.fuel_type = fuel_type;
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capacity(&self) -> Kilograms {
        self.capacity
    }

    pub fn emission_factor(&self) -> f64 {
        self.emission_factor
    }

    pub fn fuel_type(&self) -> FuelType {
        self.fuel_type
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Capacity must be positive and the emission factor non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let capacity = self.capacity.value();
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(format!("invalid capacity {capacity}"));
        }
        if !self.emission_factor.is_finite() || self.emission_factor < 0.0 {
            return Err(format!("invalid emission factor {}", self.emission_factor));
        }

        Ok(())
    }
}

/// Stable sort putting electric vehicles first, then hybrid, diesel and gasoline.
pub fn sort_by_ev_priority(vehicles: &mut [Vehicle]) {
    vehicles.sort_by_key(|vehicle| vehicle.fuel_type().ev_priority_rank());
}
