use crate::problem::order::{NodeIdx, Order};

/// Optional visit: the engine may skip `node` and pay `penalty` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disjunction {
    pub node: NodeIdx,
    pub penalty: i64,
}

/// One disjunction per non-depot node, priced by its priority tier.
pub fn priority_disjunctions(nodes: &[Order]) -> Vec<Disjunction> {
    nodes
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, order)| Disjunction {
            node: NodeIdx::new(index),
            penalty: order.priority().drop_penalty(),
        })
        .collect()
}
