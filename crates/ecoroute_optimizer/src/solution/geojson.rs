use geojson::{Feature, FeatureCollection, Geometry, JsonObject};

use crate::{problem::location::Location, solution::route::RoutingSolution};

/// `LineString` feature through `locations`, keyed by `vehicle_id`.
/// Coordinates are `[lon, lat]`. Paths with fewer than two points are skipped.
pub fn route_feature(vehicle_id: &str, locations: &[Location]) -> Option<Feature> {
    if locations.len() < 2 {
        return None;
    }

    let line_string = locations
        .iter()
        .map(geo::Coord::from)
        .collect::<geo::LineString>();

    let mut properties = JsonObject::new();
    properties.insert("vehicle_id".to_owned(), vehicle_id.into());

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&line_string))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

pub fn routes_feature_collection<'a, I>(routes: I) -> FeatureCollection
where
    I: IntoIterator<Item = (&'a str, &'a [Location])>,
{
    FeatureCollection {
        bbox: None,
        features: routes
            .into_iter()
            .filter_map(|(vehicle_id, locations)| route_feature(vehicle_id, locations))
            .collect(),
        foreign_members: None,
    }
}

pub fn solution_feature_collection(solution: &RoutingSolution) -> FeatureCollection {
    let routes = solution
        .routes
        .iter()
        .map(|route| (route.vehicle_id.as_str(), route.locations()))
        .collect::<Vec<_>>();

    routes_feature_collection(
        routes
            .iter()
            .map(|(vehicle_id, locations)| (*vehicle_id, locations.as_slice())),
    )
}
