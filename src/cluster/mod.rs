/// Euclidean distance between feature vectors
pub mod distance;
/// The K-Means clustering model
pub mod kmeans;
