use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    problem::location::Location,
    solution::{output_error::OutputError, route::RouteStop},
};

/// Persisted per-stop row. Weights are written with two decimals.
#[derive(Debug, Serialize)]
struct CsvRouteStop<'a> {
    vehicle_id: &'a str,
    vehicle_index: usize,
    stop_index: usize,
    order_id: &'a str,
    demand_kg: String,
    cumulative_load_kg: String,
    lat: f64,
    lon: f64,
}

impl<'a> From<&'a RouteStop> for CsvRouteStop<'a> {
    fn from(stop: &'a RouteStop) -> Self {
        CsvRouteStop {
            vehicle_id: &stop.vehicle_id,
            vehicle_index: stop.vehicle_index,
            stop_index: stop.stop_index,
            order_id: &stop.order_id,
            demand_kg: format!("{:.2}", stop.demand_kg),
            cumulative_load_kg: format!("{:.2}", stop.cumulative_load_kg),
            lat: stop.lat,
            lon: stop.lon,
        }
    }
}

pub fn write_route_stops<'a, W, I>(writer: W, stops: I) -> Result<(), OutputError>
where
    W: Write,
    I: IntoIterator<Item = &'a RouteStop>,
{
    let mut writer = csv::Writer::from_writer(writer);

    for stop in stops {
        writer.serialize(CsvRouteStop::from(stop))?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_route_stops_to_path<'a, I>(path: &Path, stops: I) -> Result<(), OutputError>
where
    I: IntoIterator<Item = &'a RouteStop>,
{
    let file = File::create(path)?;
    write_route_stops(file, stops)
}

#[derive(Debug, Deserialize)]
struct CsvRouteCoordinate {
    vehicle_id: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
}

/// Stop coordinates of a persisted route file, grouped by vehicle in order
/// of first appearance. Rows without a vehicle or with unparseable
/// coordinates are skipped.
pub fn read_route_locations<R: Read>(reader: R) -> Result<Vec<(String, Vec<Location>)>, OutputError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut routes: Vec<(String, Vec<Location>)> = vec![];

    for (line, record) in reader.deserialize::<CsvRouteCoordinate>().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                warn!(line, %error, "Skipping unreadable route row");
                continue;
            }
        };

        let Some(vehicle_id) = record.vehicle_id.filter(|id| !id.is_empty()) else {
            continue;
        };
        let (Some(lat), Some(lon)) = (
            record.lat.and_then(|lat| lat.parse::<f64>().ok()),
            record.lon.and_then(|lon| lon.parse::<f64>().ok()),
        ) else {
            warn!(line, %vehicle_id, "Skipping route row without coordinates");
            continue;
        };

        let location = Location::from_lat_lon(lat, lon);
        match routes.iter_mut().find(|(id, _)| *id == vehicle_id) {
            Some((_, locations)) => locations.push(location),
            None => routes.push((vehicle_id, vec![location])),
        }
    }

    Ok(routes)
}

pub fn read_route_locations_from_path(
    path: &Path,
) -> Result<Vec<(String, Vec<Location>)>, OutputError> {
    read_route_locations(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(vehicle_id: &str, stop_index: usize, order_id: &str, demand: f64, load: f64) -> RouteStop {
        RouteStop {
            vehicle_id: vehicle_id.to_owned(),
            vehicle_index: 0,
            stop_index,
            order_id: order_id.to_owned(),
            demand_kg: demand,
            cumulative_load_kg: load,
            lat: 46.05 + stop_index as f64 * 0.01,
            lon: 14.46,
            arrival_minute: 0,
        }
    }

    #[test]
    fn test_write_route_stops() {
        let stops = vec![stop("v1", 0, "depot", 0.0, 0.0), stop("v1", 1, "o1", 2.5, 2.5)];
        let mut buffer = vec![];

        write_route_stops(&mut buffer, &stops).unwrap();

        let written = String::from_utf8(buffer).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("vehicle_id,vehicle_index,stop_index,order_id,demand_kg,cumulative_load_kg,lat,lon")
        );
        assert_eq!(lines.next(), Some("v1,0,0,depot,0.00,0.00,46.05,14.46"));
        assert!(lines.next().unwrap().starts_with("v1,0,1,o1,2.50,2.50,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_read_route_locations_skips_malformed_rows() {
        let data = "\
vehicle_id,vehicle_index,stop_index,order_id,demand_kg,cumulative_load_kg,lat,lon
v1,0,0,depot,0.00,0.00,46.05,14.46
v1,0,1,o1,1.00,1.00,not-a-number,14.47
,0,2,o2,1.00,2.00,46.07,14.48
v2,1,0,depot,0.00,0.00,46.05,14.46
v1,0,2,o3,1.00,2.00,46.08,14.49
";

        let routes = read_route_locations(data.as_bytes()).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].0, "v1");
        assert_eq!(
            routes[0].1,
            vec![
                Location::from_lat_lon(46.05, 14.46),
                Location::from_lat_lon(46.08, 14.49)
            ]
        );
        assert_eq!(routes[1].0, "v2");
        assert_eq!(routes[1].1.len(), 1);
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.csv");
        let stops = vec![stop("v1", 0, "depot", 0.0, 0.0), stop("v1", 1, "o1", 1.0, 1.0)];

        write_route_stops_to_path(&path, &stops).unwrap();
        let routes = read_route_locations_from_path(&path).unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].1.len(), 2);
    }
}
