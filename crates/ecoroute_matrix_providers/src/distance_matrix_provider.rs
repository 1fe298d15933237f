use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::distance_matrix::DistanceMatrix;

#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub enum DistanceMatrixProvider {
    /// Haversine distances derived from the node coordinates.
    #[default]
    AsTheCrowFlies,

    /// A matrix computed ahead of time over the same node order, depot first.
    Precomputed { matrix: DistanceMatrix },
}

impl std::hash::Hash for DistanceMatrixProvider {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            DistanceMatrixProvider::AsTheCrowFlies => {
                state.write_u8(0);
            }
            DistanceMatrixProvider::Precomputed { matrix } => {
                state.write_u8(1);
                matrix.hash(state);
            }
        }
    }
}
