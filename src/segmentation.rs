use std::error::Error;

use nalgebra::DVector;

use crate::cluster::kmeans::{FitStatus, InitMethod, KMeans};
use crate::data::customer::{project_all, Customer, Feature};

/// A cluster produced by a segmentation run: its final centroid in the
/// selected feature space, and the customers assigned to it.
#[derive(Debug, Clone)]
pub struct ClusterGroup {
    pub centroid: DVector<f64>,
    pub members: Vec<Customer>,
}

/// The result of one segmentation run. `assignments` is positionally
/// aligned with the input customers; `clusters.len()` always equals the
/// requested cluster count.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub clusters: Vec<ClusterGroup>,
    pub assignments: Vec<usize>,
    pub status: FitStatus,
}

/// Partitions customers into `num_clusters` segments over the selected
/// features.
///
/// Runs synchronously to a terminal state and returns a full snapshot; there
/// are no partial results. Pass `None` for `init` to use the default
/// `InitMethod::FirstK` seeding.
///
/// # Errors
///
/// An error will be returned if:
/// * The feature selection is empty.
/// * `num_clusters` is 0.
/// * There are no customers, or fewer customers than clusters.
///
/// # Examples
///
/// ```
/// use segmenta::data::customer::{Customer, Feature, Gender};
/// use segmenta::segmentation::segment_customers;
///
/// let customers = vec![
///     Customer::new(1, Gender::Male, 19.0, 15.0, 39.0),
///     Customer::new(2, Gender::Male, 21.0, 15.0, 81.0),
///     Customer::new(3, Gender::Female, 20.0, 16.0, 6.0),
///     Customer::new(4, Gender::Female, 23.0, 16.0, 77.0),
/// ];
/// let features = [Feature::AnnualIncome, Feature::SpendingScore];
///
/// let segmentation = segment_customers(&customers, &features, 2, None).unwrap();
///
/// let total_members: usize = segmentation.clusters.iter().map(|c| c.members.len()).sum();
/// assert_eq!(total_members, customers.len());
/// ```
pub fn segment_customers(
    customers: &[Customer],
    features: &[Feature],
    num_clusters: usize,
    init: Option<InitMethod>,
) -> Result<Segmentation, Box<dyn Error>> {
    if features.is_empty() {
        return Err("The feature selection must not be empty.".into());
    }
    if num_clusters == 0 {
        return Err("The number of clusters must be greater than 0.".into());
    }
    if customers.is_empty() {
        return Err("The dataset must not be empty.".into());
    }
    if customers.len() < num_clusters {
        return Err("The dataset must contain at least as many records as clusters.".into());
    }

    let dataset = project_all(customers, features)?;

    let mut model = KMeans::with_params(Some(num_clusters), None, init)?;
    model.fit(&dataset, None)?;

    let labels = model.labels().ok_or("The model has not been fitted.")?.clone();
    let centroids = model
        .centroids()
        .ok_or("The model has not been fitted.")?
        .clone();
    let status = model.status().ok_or("The model has not been fitted.")?;

    let mut clusters = (0..num_clusters)
        .map(|cluster| ClusterGroup {
            centroid: centroids.row(cluster).transpose(),
            members: Vec::new(),
        })
        .collect::<Vec<_>>();

    for (index, &label) in labels.iter().enumerate() {
        clusters[label].members.push(customers[index].clone());
    }

    Ok(Segmentation {
        clusters,
        assignments: labels,
        status,
    })
}
