/// Cluster summaries and insight generation
pub mod generator;
