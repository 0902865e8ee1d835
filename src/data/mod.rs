/// Customer records, features, and CSV loading
pub mod customer;
/// Numeric trait aliases and the dataset container
pub mod dataset;
