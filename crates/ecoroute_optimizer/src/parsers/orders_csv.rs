use std::{fs::File, io::Read, path::Path};

use fxhash::FxHashSet;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    parsers::error::{ParseError, csv_reader, parse_optional_f64},
    problem::{
        kilograms::Kilograms, location::Location, order::Order, priority::Priority,
        time_window::TimeWindow,
    },
};

#[derive(Debug, Deserialize)]
struct CsvOrder {
    #[serde(rename = "OrderID")]
    id: Option<String>,
    #[serde(rename = "Weight(kg)")]
    weight: Option<String>,
    #[serde(rename = "Priority")]
    priority: Option<String>,
    #[serde(rename = "WindowStart")]
    window_start: Option<String>,
    #[serde(rename = "WindowEnd")]
    window_end: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
}

impl CsvOrder {
    fn into_order(self) -> Result<Order, String> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or("missing OrderID")?;

        let weight = parse_optional_f64(self.weight.as_deref())?.unwrap_or(0.0);
        if !weight.is_finite() || weight < 0.0 {
            return Err(format!("invalid weight {weight}"));
        }

        let (Some(lat), Some(lon)) = (
            parse_optional_f64(self.lat.as_deref())?,
            parse_optional_f64(self.lon.as_deref())?,
        ) else {
            return Err("missing coordinate".to_owned());
        };
        let location = Location::from_lat_lon(lat, lon);
        if !location.is_finite() {
            return Err("non finite coordinate".to_owned());
        }

        let priority = self
            .priority
            .as_deref()
            .map(Priority::from)
            .unwrap_or_default();
        let window = TimeWindow::from_clock(self.window_start.as_deref(), self.window_end.as_deref());

        Ok(Order::new(id, Kilograms::new(weight), location)
            .with_priority(priority)
            .with_window(window))
    }
}

/// Reads orders from `OrderID, Weight(kg), Priority, WindowStart, WindowEnd,
/// lat, lon` rows. Extra columns are ignored, malformed rows and repeated
/// ids are skipped.
pub fn parse_orders<R: Read>(reader: R) -> Result<Vec<Order>, ParseError> {
    let mut reader = csv_reader(reader);
    reader.headers()?;

    let mut seen = FxHashSet::default();
    let mut orders = vec![];

    for (row, record) in reader.deserialize::<CsvOrder>().enumerate() {
        let order = record
            .map_err(|error| error.to_string())
            .and_then(CsvOrder::into_order);

        match order {
            Ok(order) if !seen.insert(order.id().to_owned()) => {
                warn!(row, id = order.id(), "Skipping duplicate order");
            }
            Ok(order) => orders.push(order),
            Err(reason) => warn!(row, %reason, "Skipping malformed order"),
        }
    }

    info!(orders = orders.len(), "Parsed orders");

    Ok(orders)
}

pub fn parse_orders_from_path(path: &Path) -> Result<Vec<Order>, ParseError> {
    parse_orders(File::open(path)?)
}
