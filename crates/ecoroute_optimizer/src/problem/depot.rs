use tracing::warn;

use crate::problem::order::Order;

/// Returns the node list with the depot at index 0.
///
/// An order carrying the depot identifier is moved to the front and stripped
/// of demand and window, otherwise the reference depot is prepended. Running
/// this on its own output is a no-op.
pub fn with_depot(orders: Vec<Order>) -> Vec<Order> {
    let mut depot = None;
    let mut rest = Vec::with_capacity(orders.len());

    for order in orders {
        if !order.is_depot() {
            rest.push(order);
        } else if depot.is_none() {
            depot = Some(order.into_depot());
        } else {
            warn!("Ignoring duplicate depot entry");
        }
    }

    let mut nodes = Vec::with_capacity(rest.len() + 1);
    nodes.push(depot.unwrap_or_else(Order::depot));
    nodes.extend(rest);
    nodes
}

#[cfg(test)]
mod tests {
    use crate::problem::{kilograms::Kilograms, location::Location, order::DEPOT_ID};

    use super::*;

    fn order(id: &str) -> Order {
        Order::new(id, Kilograms::new(1.0), Location::from_lat_lon(46.0, 14.0))
    }

    #[test]
    fn test_depot_is_prepended() {
        let nodes = with_depot(vec![order("a"), order("b")]);

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].id(), DEPOT_ID);
        assert_eq!(nodes[0], Order::depot());
    }

    #[test]
    fn test_injection_is_idempotent() {
        let once = with_depot(vec![order("a"), order("b")]);
        let twice = with_depot(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_depot_moves_to_front_without_demand() {
        let nodes = with_depot(vec![order("a"), order(DEPOT_ID), order("b")]);

        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].is_depot());
        assert_eq!(nodes[0].weight(), Kilograms::ZERO);
        assert_eq!(nodes[0].location(), &Location::from_lat_lon(46.0, 14.0));
        assert_eq!(nodes[1].id(), "a");
        assert_eq!(nodes[2].id(), "b");
    }

    #[test]
    fn test_duplicate_depots_are_collapsed() {
        let nodes = with_depot(vec![order(DEPOT_ID), order("a"), order(DEPOT_ID)]);

        assert_eq!(nodes.len(), 2);
    }
}
