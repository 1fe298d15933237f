use std::{fs::File, io::BufReader, path::Path};

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geodesy::distance_km;

pub type Distance = f64;

/// All-pairs distances in kilometers.
///
/// Stored as a flat row-major vector, the entry for a pair of locations is at
/// `from * num_locations + to`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct DistanceMatrix {
    distances: Vec<Distance>,
    num_locations: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DistanceMatrixFile {
    Flat(DistanceMatrix),
    Rows(Vec<Vec<Distance>>),
}

impl DistanceMatrix {
    pub fn from_rows(rows: Vec<Vec<Distance>>) -> Result<Self, anyhow::Error> {
        let num_locations = rows.len();

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num_locations)
        {
            return Err(anyhow::anyhow!(
                "Row {} has {} entries, expected {}",
                index,
                row.len(),
                num_locations
            ));
        }

        Ok(DistanceMatrix {
            distances: rows.into_iter().flatten().collect(),
            num_locations,
        })
    }

    pub fn from_flat(distances: Vec<Distance>, num_locations: usize) -> Result<Self, anyhow::Error> {
        let matrix = DistanceMatrix {
            distances,
            num_locations,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Derives the matrix from coordinates with the haversine distance.
    pub fn from_coordinates<P>(points: &[P]) -> Self
    where
        P: Sync,
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let num_locations = points.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];

        if num_locations > 0 {
            distances
                .par_chunks_mut(num_locations)
                .enumerate()
                .for_each(|(i, row)| {
                    let from = &points[i];
                    for (j, to) in points.iter().enumerate() {
                        if i != j {
                            row[j] = distance_km(from, to);
                        }
                    }
                });
        }

        DistanceMatrix {
            distances,
            num_locations,
        }
    }

    /// Reads a matrix from JSON, either the flat form or a list of rows.
    pub fn from_json_file(path: &Path) -> Result<Self, anyhow::Error> {
        let file = File::open(path)?;
        let parsed: DistanceMatrixFile = serde_json::from_reader(BufReader::new(file))?;

        match parsed {
            DistanceMatrixFile::Flat(matrix) => {
                matrix.validate()?;
                Ok(matrix)
            }
            DistanceMatrixFile::Rows(rows) => DistanceMatrix::from_rows(rows),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), anyhow::Error> {
        if self.distances.len() != self.num_locations * self.num_locations {
            return Err(anyhow::anyhow!(
                "Matrix has {} entries, expected {}x{}",
                self.distances.len(),
                self.num_locations,
                self.num_locations
            ));
        }

        Ok(())
    }

    #[inline(always)]
    pub fn get(&self, from: usize, to: usize) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[from * self.num_locations + to]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.num_locations).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }

    pub fn as_flat(&self) -> &[Distance] {
        &self.distances
    }
}

impl std::hash::Hash for DistanceMatrix {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.num_locations);
        for d in &self.distances {
            state.write_u64(d.to_bits());
        }
    }
}
