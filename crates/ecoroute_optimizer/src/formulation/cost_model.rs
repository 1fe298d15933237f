use ecoroute_matrix_providers::distance_matrix::DistanceMatrix;
use fxhash::FxHashMap;

use crate::{
    define_index_newtype,
    problem::{order::NodeIdx, vehicle::VehicleIdx},
};

/// Engine cost units per unit of weighted distance.
pub const SCALE_COST: f64 = 100.0;

pub type Cost = i64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    pub w_distance: f64,
    pub w_emissions: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        CostWeights {
            w_distance: 1.0,
            w_emissions: 1.0,
        }
    }
}

/// `round((w_distance * km + w_emissions * km * emission_factor) * SCALE_COST)`
pub fn arc_cost(weights: CostWeights, distance_km: f64, emission_factor: f64) -> Cost {
    let base_distance_cost = weights.w_distance * distance_km;
    let emission_cost = weights.w_emissions * distance_km * emission_factor;

    ((base_distance_cost + emission_cost) * SCALE_COST).round() as Cost
}

define_index_newtype!(CostMetricIdx, ArcCostMetric);

/// Precomputed arc costs for one emission factor.
#[derive(Debug, Clone)]
pub struct ArcCostMetric {
    emission_factor: f64,
    costs: Vec<Cost>,
    num_nodes: usize,
}

impl ArcCostMetric {
    fn new(distances: &DistanceMatrix, weights: CostWeights, emission_factor: f64) -> Self {
        let num_nodes = distances.num_locations();
        let mut costs = Vec::with_capacity(num_nodes * num_nodes);

        for from in 0..num_nodes {
            for to in 0..num_nodes {
                costs.push(arc_cost(weights, distances.get(from, to), emission_factor));
            }
        }

        ArcCostMetric {
            emission_factor,
            costs,
            num_nodes,
        }
    }

    #[inline(always)]
    pub fn cost(&self, from: NodeIdx, to: NodeIdx) -> Cost {
        self.costs[from.get() * self.num_nodes + to.get()]
    }

    pub fn emission_factor(&self) -> f64 {
        self.emission_factor
    }
}

/// Per-vehicle arc costs. Each vehicle points at the metric registered for
/// its emission factor, vehicles with the same factor share one metric.
#[derive(Debug, Clone)]
pub struct CostModel {
    weights: CostWeights,
    metrics: Vec<ArcCostMetric>,
    vehicle_metrics: Vec<CostMetricIdx>,
}

impl CostModel {
    /// `emission_factors[v]` is the factor of vehicle `v`.
    pub fn register(
        distances: &DistanceMatrix,
        emission_factors: &[f64],
        weights: CostWeights,
    ) -> Self {
        let mut metrics: Vec<ArcCostMetric> = Vec::new();
        let mut registered: FxHashMap<u64, CostMetricIdx> = FxHashMap::default();

        let vehicle_metrics = emission_factors
            .iter()
            .map(|&emission_factor| {
                *registered
                    .entry(emission_factor.to_bits())
                    .or_insert_with(|| {
                        metrics.push(ArcCostMetric::new(distances, weights, emission_factor));
                        CostMetricIdx::new(metrics.len() - 1)
                    })
            })
            .collect();

        CostModel {
            weights,
            metrics,
            vehicle_metrics,
        }
    }

    #[inline(always)]
    pub fn arc_cost(&self, vehicle: VehicleIdx, from: NodeIdx, to: NodeIdx) -> Cost {
        self.metric(self.metric_for(vehicle)).cost(from, to)
    }

    pub fn metric_for(&self, vehicle: VehicleIdx) -> CostMetricIdx {
        self.vehicle_metrics[vehicle.get()]
    }

    pub fn metric(&self, metric: CostMetricIdx) -> &ArcCostMetric {
        &self.metrics[metric]
    }

    pub fn metrics(&self) -> &[ArcCostMetric] {
        &self.metrics
    }

    pub fn vehicle_metrics(&self) -> &[CostMetricIdx] {
        &self.vehicle_metrics
    }

    pub fn weights(&self) -> CostWeights {
        self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distances() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 1.5, 2.0],
            vec![1.5, 0.0, 0.25],
            vec![2.0, 0.25, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_arc_cost_formula() {
        let weights = CostWeights {
            w_distance: 1.0,
            w_emissions: 1.0,
        };

        // (1.5 + 1.5 * 250) * 100
        assert_eq!(arc_cost(weights, 1.5, 250.0), 37_650);
        assert_eq!(arc_cost(weights, 1.5, 0.0), 150);
        assert_eq!(arc_cost(weights, 0.0, 250.0), 0);
    }

    #[test]
    fn test_arc_cost_rounds() {
        let weights = CostWeights {
            w_distance: 1.0,
            w_emissions: 0.0,
        };

        assert_eq!(arc_cost(weights, 0.01234, 0.0), 1);
        assert_eq!(arc_cost(weights, 0.01678, 0.0), 2);
    }

    #[test]
    fn test_vehicles_with_distinct_factors_get_distinct_metrics() {
        let model = CostModel::register(&distances(), &[0.0, 250.0, 0.0], CostWeights::default());

        assert_eq!(model.metrics().len(), 2);
        assert_eq!(
            model.metric_for(VehicleIdx::new(0)),
            model.metric_for(VehicleIdx::new(2))
        );
        assert_ne!(
            model.metric_for(VehicleIdx::new(0)),
            model.metric_for(VehicleIdx::new(1))
        );
    }

    #[test]
    fn test_electric_vehicle_is_cheaper_on_every_arc() {
        let model = CostModel::register(&distances(), &[0.0, 250.0], CostWeights::default());
        let electric = VehicleIdx::new(0);
        let diesel = VehicleIdx::new(1);

        for from in 0..3 {
            for to in 0..3 {
                let (from, to) = (NodeIdx::new(from), NodeIdx::new(to));
                if from == to {
                    continue;
                }
                assert!(model.arc_cost(electric, from, to) < model.arc_cost(diesel, from, to));
            }
        }
    }

    #[test]
    fn test_diagonal_is_free() {
        let model = CostModel::register(&distances(), &[250.0], CostWeights::default());
        let node = NodeIdx::new(1);

        assert_eq!(model.arc_cost(VehicleIdx::new(0), node, node), 0);
    }
}
