//! # Segmenta
//!
//! `segmenta` provides customer segmentation using K-Means clustering in Rust.
//! It also contains utilities for feature projection, clustering quality
//! metrics, and template-based marketing insight generation.
//!
//! ## Getting Started
//!
//! To use `segmenta`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! segmenta = "*"
//! ```
//!
//! ## Example Usage
//!
//! As a quick example, here's how you can use `segmenta` to partition a small
//! customer dataset into two segments over the income/spending plane:
//!
//! ```rust
//!
//! use segmenta::data::customer::{Customer, Feature, Gender};
//! use segmenta::segmentation::segment_customers;
//!
//! let customers = vec![
//!     Customer::new(1, Gender::Male, 19.0, 15.0, 39.0),
//!     Customer::new(2, Gender::Male, 21.0, 15.0, 81.0),
//!     Customer::new(3, Gender::Female, 20.0, 16.0, 6.0),
//!     Customer::new(4, Gender::Female, 23.0, 16.0, 77.0),
//! ];
//!
//! let features = [Feature::AnnualIncome, Feature::SpendingScore];
//!
//! let segmentation = segment_customers(&customers, &features, 2, None).unwrap();
//!
//! assert_eq!(segmentation.assignments.len(), 4);
//! assert_eq!(segmentation.clusters.len(), 2);
//! ```

/// The clustering core: distance function and K-Means
pub mod cluster;
/// Dataset and customer record utilities
pub mod data;
/// Marketing insight generation
pub mod insights;
/// Functions for evaluating clustering quality
pub mod metrics;
/// The customer segmentation service
pub mod segmentation;
