//! Mermaid flowchart export.

use crate::graph::{DirectedGraph, EdgeData};
use std::fmt::Write;

impl<N, E> DirectedGraph<N, E> {
    /// Render the graph as a Mermaid `graph TD` flowchart.
    ///
    /// `node_label` names each node; `edge_arrow` picks the arrow token
    /// (e.g. `-->` or `-.->`) per edge. The relation name labels the arrow.
    pub fn to_mermaid_with<L, A>(&self, node_label: L, edge_arrow: A) -> String
    where
        L: Fn(&N) -> String,
        A: Fn(&EdgeData<E>) -> &'static str,
    {
        let mut out = String::from("graph TD\n");
        for id in self.node_ids() {
            if let Some(node) = self.get_node(id) {
                let _ = writeln!(out, "  {}[\"{}\"]", id, escape(&node_label(node)));
            }
        }
        for edge in self.edges() {
            let _ = writeln!(
                out,
                "  {} {}|\"{}\"| {}",
                edge.initial,
                edge_arrow(edge),
                escape(&edge.relation_name),
                edge.terminal
            );
        }
        out
    }
}

fn escape(text: &str) -> String {
    text.replace('"', "#quot;")
}
