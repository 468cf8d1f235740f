use crate::data::{Ledger, Sankey, BUDGET_NODE};
use rust_decimal::{prelude::ToPrimitive, Decimal};

/// A weighted link from the budget source to a category. The weight is always the
/// absolute value of the amount(s) it stands for; whether money came in or went out is
/// lost in this view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlowEdge {
    pub source: String,
    pub target: String,
    pub weight: Decimal,
}

/// Nodes and edges of the Sankey view. Nothing here outlives a render: it's rebuilt from
/// the `Ledger` every time. Only the builders below create one, so every edge endpoint is
/// a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlowGraph {
    nodes: Vec<String>,
    edges: Vec<FlowEdge>,
}

/// Distinct categories in first-seen order, followed by the budget node. A category
/// literally called "Budget" is folded into the source node rather than duplicated.
fn nodes(ledger: &Ledger) -> Vec<String> {
    let mut nodes: Vec<String> = Vec::new();
    for tx in ledger.iter() {
        if tx.category != BUDGET_NODE && !nodes.contains(&tx.category) {
            nodes.push(tx.category.clone());
        }
    }
    nodes.push(BUDGET_NODE.to_string());
    nodes
}

fn edge(target: &str, weight: Decimal) -> FlowEdge {
    FlowEdge {
        source: BUDGET_NODE.to_string(),
        target: target.to_string(),
        weight,
    }
}

/// One edge per transaction, in ledger order, weighted by the absolute amount. Edges are
/// not merged: several of them may point at the same category.
pub(crate) fn build_flow_graph(ledger: &Ledger) -> FlowGraph {
    FlowGraph {
        nodes: nodes(ledger),
        edges: ledger
            .iter()
            .map(|tx| edge(&tx.category, tx.amount.abs()))
            .collect(),
    }
}

/// Per-category rollup of `build_flow_graph`: one edge per category node, in node order.
pub(crate) fn build_aggregated_flow_graph(ledger: &Ledger) -> FlowGraph {
    let nodes = nodes(ledger);
    let edges = nodes
        .iter()
        .filter_map(|node| {
            let mut matching = ledger.iter().filter(|tx| tx.category == *node).peekable();
            // only the budget node can have no transaction behind it
            matching.peek()?;
            Some(edge(node, matching.map(|tx| tx.amount.abs()).sum()))
        })
        .collect();
    FlowGraph { nodes, edges }
}

impl FlowGraph {
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Turn named edges into the index arrays a Sankey chart consumes.
    pub fn to_sankey(&self) -> Sankey {
        let index = |name: &str| {
            let found = self.nodes.iter().position(|n| n == name);
            debug_assert!(found.is_some(), "edge endpoint {name} is not a node");
            found.unwrap_or_default()
        };
        Sankey {
            labels: self.nodes.clone(),
            source: self.edges.iter().map(|e| index(&e.source)).collect(),
            target: self.edges.iter().map(|e| index(&e.target)).collect(),
            value: self
                .edges
                .iter()
                .map(|e| e.weight.to_f64().unwrap_or_default())
                .collect(),
        }
    }
}
