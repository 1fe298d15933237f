use tracing::{debug, instrument, warn};

use crate::{
    cache::{MatricesCache, NoCache},
    distance_matrix::DistanceMatrix,
    distance_matrix_provider::DistanceMatrixProvider,
};

/// Resolves the distance matrix for an ordered list of points.
///
/// A precomputed matrix is used as-is when its size matches the points. In
/// every other case the matrix is derived from the coordinates, going through
/// the cache first. Cache failures are logged and never fail the lookup.
pub struct DistanceMatrixClient<C = NoCache> {
    cache: C,
}

impl Default for DistanceMatrixClient<NoCache> {
    fn default() -> Self {
        Self { cache: NoCache }
    }
}

impl<C> DistanceMatrixClient<C>
where
    C: MatricesCache,
{
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    #[instrument(skip_all, level = "debug", fields(points = points.len()))]
    pub fn fetch_matrix<P>(&self, points: &[P], provider: DistanceMatrixProvider) -> DistanceMatrix
    where
        P: Sync,
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if let DistanceMatrixProvider::Precomputed { matrix } = provider {
            if matrix.num_locations() == points.len() {
                return matrix;
            }

            warn!(
                "Precomputed matrix covers {} locations but {} were given, deriving from coordinates",
                matrix.num_locations(),
                points.len()
            );
        }

        match self.cache.get_cached(points) {
            Ok(Some(matrix)) if matrix.num_locations() == points.len() => {
                debug!("Distance matrix cache hit");
                return matrix;
            }
            Ok(_) => debug!("Distance matrix cache miss"),
            Err(err) => warn!("Distance matrix cache unavailable: {}", err),
        }

        let matrix = DistanceMatrix::from_coordinates(points);

        if let Err(err) = self.cache.cache(points, &matrix) {
            warn!("Could not cache distance matrix: {}", err);
        }

        matrix
    }
}

#[cfg(test)]
mod tests {
    use geo_types::Point;

    use crate::cache::FolderMatricesCache;

    use super::*;

    struct LatLon(f64, f64);

    impl From<&LatLon> for Point {
        fn from(value: &LatLon) -> Self {
            Point::new(value.1, value.0)
        }
    }

    fn points() -> Vec<LatLon> {
        vec![LatLon(46.05, 14.46), LatLon(46.06, 14.50), LatLon(46.55, 15.65)]
    }

    #[test]
    fn test_precomputed_is_used_when_size_matches() {
        let client = DistanceMatrixClient::default();
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 7.0, 9.0]; 3]).unwrap();

        let fetched = client.fetch_matrix(
            &points(),
            DistanceMatrixProvider::Precomputed {
                matrix: matrix.clone(),
            },
        );

        assert_eq!(fetched, matrix);
    }

    #[test]
    fn test_precomputed_with_wrong_size_falls_back() {
        let client = DistanceMatrixClient::default();
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 7.0], vec![7.0, 0.0]]).unwrap();

        let fetched = client.fetch_matrix(&points(), DistanceMatrixProvider::Precomputed { matrix });

        assert_eq!(fetched, DistanceMatrix::from_coordinates(&points()));
    }

    #[test]
    fn test_derived_matrix_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let client = DistanceMatrixClient::new(FolderMatricesCache::new(dir.path()));

        let first = client.fetch_matrix(&points(), DistanceMatrixProvider::AsTheCrowFlies);

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        let second = client.fetch_matrix(&points(), DistanceMatrixProvider::AsTheCrowFlies);
        assert_eq!(first, second);
    }

    #[test]
    fn test_corrupt_cache_entry_is_derived_again() {
        let dir = tempfile::tempdir().unwrap();
        let client = DistanceMatrixClient::new(FolderMatricesCache::new(dir.path()));
        client.fetch_matrix(&points(), DistanceMatrixProvider::AsTheCrowFlies);

        let entry = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        std::fs::write(entry.path(), r#"{"distances":[0.0,1.0],"num_locations":3}"#).unwrap();

        let matrix = client.fetch_matrix(&points(), DistanceMatrixProvider::AsTheCrowFlies);

        assert_eq!(matrix, DistanceMatrix::from_coordinates(&points()));
        assert!(matrix.get(2, 1) > 0.0);
    }

    #[test]
    fn test_broken_cache_still_derives() {
        let client = DistanceMatrixClient::new(FolderMatricesCache::new("/does/not/exist"));

        let matrix = client.fetch_matrix(&points(), DistanceMatrixProvider::AsTheCrowFlies);

        assert_eq!(matrix.num_locations(), 3);
    }
}
