// Pure data and logic: wire records, permission codes, render graph.

pub mod permission;
pub mod render_graph;
pub mod topology;
