use std::{fs::File, io::Read, path::Path};

use fxhash::FxHashSet;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    parsers::error::{ParseError, csv_reader, parse_optional_f64},
    problem::{
        kilograms::Kilograms,
        vehicle::{FuelType, Vehicle},
    },
};

#[derive(Debug, Deserialize)]
struct CsvVehicle {
    vehicle_id: Option<String>,
    max_capacity_kg: Option<String>,
    emission_g_co2_per_km: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    fuel_type: Option<String>,
}

impl CsvVehicle {
    fn into_vehicle(self) -> Result<Vehicle, String> {
        let id = self
            .vehicle_id
            .filter(|id| !id.is_empty())
            .ok_or("missing vehicle_id")?;

        let capacity = parse_optional_f64(self.max_capacity_kg.as_deref())?
            .ok_or("missing max_capacity_kg")?;
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(format!("invalid capacity {capacity}"));
        }

        let emission_factor = parse_optional_f64(self.emission_g_co2_per_km.as_deref())?
            .ok_or("missing emission_g_co2_per_km")?;
        if !emission_factor.is_finite() || emission_factor < 0.0 {
            return Err(format!("invalid emission factor {emission_factor}"));
        }

        let mut vehicle = Vehicle::new(id, Kilograms::new(capacity), emission_factor);
        if let Some(fuel_type) = self.fuel_type.as_deref() {
            vehicle = vehicle.with_fuel_type(FuelType::from(fuel_type));
        }
        if let Some(kind) = self.kind.filter(|kind| !kind.is_empty()) {
            vehicle = vehicle.with_kind(kind);
        }

        Ok(vehicle)
    }
}

/// Reads vehicles from `vehicle_id, max_capacity_kg, emission_g_co2_per_km`
/// rows with optional `type` and `fuel_type`. Malformed rows and repeated
/// ids are skipped.
pub fn parse_vehicles<R: Read>(reader: R) -> Result<Vec<Vehicle>, ParseError> {
    let mut reader = csv_reader(reader);
    reader.headers()?;

    let mut seen = FxHashSet::default();
    let mut vehicles = vec![];

    for (row, record) in reader.deserialize::<CsvVehicle>().enumerate() {
        let vehicle = record
            .map_err(|error| error.to_string())
            .and_then(CsvVehicle::into_vehicle);

        match vehicle {
            Ok(vehicle) if !seen.insert(vehicle.id().to_owned()) => {
                warn!(row, id = vehicle.id(), "Skipping duplicate vehicle");
            }
            Ok(vehicle) => vehicles.push(vehicle),
            Err(reason) => warn!(row, %reason, "Skipping malformed vehicle"),
        }
    }

    info!(vehicles = vehicles.len(), "Parsed vehicles");

    Ok(vehicles)
}

pub fn parse_vehicles_from_path(path: &Path) -> Result<Vec<Vehicle>, ParseError> {
    parse_vehicles(File::open(path)?)
}
