use std::{
    hash::{Hash, Hasher},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::FxHasher64;

use crate::distance_matrix::DistanceMatrix;

pub const CACHE_FOLDER_ENV_VAR: &str = "ECOROUTE_CACHE_FOLDER";

pub trait MatricesCache {
    fn cache<P>(&self, points: &[P], matrix: &DistanceMatrix) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>;

    fn get_cached<P>(&self, points: &[P]) -> Result<Option<DistanceMatrix>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>;
}

/// Never stores anything, every lookup misses.
#[derive(Default, Clone, Copy)]
pub struct NoCache;

impl MatricesCache for NoCache {
    fn cache<P>(&self, _points: &[P], _matrix: &DistanceMatrix) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        Ok(())
    }

    fn get_cached<P>(&self, _points: &[P]) -> Result<Option<DistanceMatrix>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        Ok(None)
    }
}

fn hash_points<H, P>(points: &[P], hasher: &mut H)
where
    H: Hasher,
    for<'a> &'a P: Into<geo_types::Point>,
{
    points.len().hash(hasher);
    for point in points {
        let point = point.into();
        hasher.write_u64(point.x().to_bits());
        hasher.write_u64(point.y().to_bits());
    }
}

fn get_filename<P>(points: &[P]) -> String
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let mut hasher = FxHasher64::default();
    hash_points(points, &mut hasher);

    format!("{:016x}.json", hasher.finish())
}

/// Stores derived matrices as JSON files named after a hash of the coordinates.
pub struct FolderMatricesCache {
    folder: PathBuf,
}

impl FolderMatricesCache {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(CACHE_FOLDER_ENV_VAR).ok().map(Self::new)
    }

    fn folder(&self) -> Result<&Path, anyhow::Error> {
        if !self.folder.is_dir() {
            return Err(anyhow::anyhow!(
                "Path {} is not a directory",
                self.folder.display()
            ));
        }

        Ok(&self.folder)
    }
}

impl MatricesCache for FolderMatricesCache {
    fn cache<P>(&self, points: &[P], matrix: &DistanceMatrix) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let path = self.folder()?.join(get_filename(points));

        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, matrix)?;
        writer.flush()?;

        Ok(())
    }

    fn get_cached<P>(&self, points: &[P]) -> Result<Option<DistanceMatrix>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let path = self.folder()?.join(get_filename(points));

        if !path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(path)?;
        let matrix: DistanceMatrix = serde_json::from_reader(BufReader::new(file))?;
        matrix.validate()?;

        Ok(Some(matrix))
    }
}

impl<C: MatricesCache> MatricesCache for Option<C> {
    fn cache<P>(&self, points: &[P], matrix: &DistanceMatrix) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        match self {
            Some(cache) => cache.cache(points, matrix),
            None => Ok(()),
        }
    }

    fn get_cached<P>(&self, points: &[P]) -> Result<Option<DistanceMatrix>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        match self {
            Some(cache) => cache.get_cached(points),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use geo_types::Point;

    use super::*;

    struct LatLon(f64, f64);

    impl From<&LatLon> for Point {
        fn from(value: &LatLon) -> Self {
            Point::new(value.1, value.0)
        }
    }

    #[test]
    fn test_filename_depends_on_points() {
        let a = [LatLon(46.0, 14.0), LatLon(46.1, 14.1)];
        let b = [LatLon(46.0, 14.0), LatLon(46.1, 14.2)];

        assert_eq!(get_filename(&a), get_filename(&a));
        assert_ne!(get_filename(&a), get_filename(&b));
    }

    #[test]
    fn test_folder_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FolderMatricesCache::new(dir.path());
        let points = [LatLon(46.0, 14.0), LatLon(46.1, 14.1)];

        assert!(cache.get_cached(&points).unwrap().is_none());

        let matrix = DistanceMatrix::from_coordinates(&points);
        cache.cache(&points, &matrix).unwrap();

        assert_eq!(cache.get_cached(&points).unwrap(), Some(matrix));
    }

    #[test]
    fn test_folder_cache_rejects_truncated_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FolderMatricesCache::new(dir.path());
        let points = [LatLon(46.0, 14.0), LatLon(46.1, 14.1), LatLon(46.2, 14.2)];

        std::fs::write(
            dir.path().join(get_filename(&points)),
            r#"{"distances":[0.0,1.0],"num_locations":3}"#,
        )
        .unwrap();

        assert!(cache.get_cached(&points).is_err());
    }

    #[test]
    fn test_folder_cache_missing_folder() {
        let cache = FolderMatricesCache::new("/this/folder/does/not/exist");
        let points = [LatLon(46.0, 14.0)];

        assert!(cache.get_cached(&points).is_err());
    }
}
