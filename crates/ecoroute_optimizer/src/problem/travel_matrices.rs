use ecoroute_matrix_providers::distance_matrix::{Distance, DistanceMatrix};

use crate::problem::{kmh::Kmh, location::Location, order::NodeIdx, time_window::Minutes};

/// Whole-minute travel times between nodes, flat row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMatrix {
    times: Vec<Minutes>,
    num_nodes: usize,
}

/// Travel time for every ordered pair: `floor(distance_km / speed * 60)`, zero on the diagonal.
pub fn build_time_matrix(locations: &[Location], speed: Kmh) -> TimeMatrix {
    let num_nodes = locations.len();
    let mut times: Vec<Minutes> = vec![0; num_nodes * num_nodes];

    for (i, from) in locations.iter().enumerate() {
        for (j, to) in locations.iter().enumerate() {
            if i == j {
                continue;
            }

            let hours = from.distance_km(to) / speed.value();
            times[i * num_nodes + j] = (hours * 60.0).floor() as Minutes;
        }
    }

    TimeMatrix { times, num_nodes }
}

impl TimeMatrix {
    pub fn from_rows(rows: Vec<Vec<Minutes>>) -> Self {
        let num_nodes = rows.len();
        debug_assert!(rows.iter().all(|row| row.len() == num_nodes));

        TimeMatrix {
            times: rows.into_iter().flatten().collect(),
            num_nodes,
        }
    }

    #[inline(always)]
    pub fn get(&self, from: NodeIdx, to: NodeIdx) -> Minutes {
        self.times[from.get() * self.num_nodes + to.get()]
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }
}

/// Distances drive the cost, times drive the time dimension. Both cover the
/// same node order, depot first.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: DistanceMatrix,
    times: TimeMatrix,
}

impl TravelMatrices {
    pub(crate) fn new(distances: DistanceMatrix, times: TimeMatrix) -> Self {
        debug_assert_eq!(
            distances.num_locations(),
            times.num_nodes(),
            "Distance and time matrices must cover the same nodes"
        );

        TravelMatrices { distances, times }
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: NodeIdx, to: NodeIdx) -> Distance {
        self.distances.get(from.get(), to.get())
    }

    #[inline(always)]
    pub fn travel_time(&self, from: NodeIdx, to: NodeIdx) -> Minutes {
        self.times.get(from, to)
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn times(&self) -> &TimeMatrix {
        &self.times
    }

    pub fn num_nodes(&self) -> usize {
        self.times.num_nodes()
    }
}
