pub mod gitgraph;

pub use gitgraph::GitgraphJsSink;
