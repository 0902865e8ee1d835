use std::error::Error;

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::cluster::distance::euclidean_distance;
use crate::data::dataset::RealNumber;

pub trait ClusteringMetrics<T: RealNumber> {
    /// Computes the within-cluster sum of squared distances to the centroids.
    ///
    /// # Arguments
    ///
    /// * `x` - The projected records, one row per record.
    /// * `labels` - The cluster index per record.
    /// * `centroids` - The centroid rows the labels refer to.
    ///
    /// # Returns
    ///
    /// The inertia as a `Result` containing a `T` value or an error message.
    fn inertia(
        &self,
        x: &DMatrix<T>,
        labels: &[usize],
        centroids: &DMatrix<T>,
    ) -> Result<T, Box<dyn Error>> {
        if labels.len() != x.nrows() {
            return Err("Labels and records are of different sizes.".into());
        }

        let mut total = T::from_f64(0.0).unwrap();
        for (index, &label) in labels.iter().enumerate() {
            if label >= centroids.nrows() {
                return Err("A label refers to a centroid that does not exist.".into());
            }
            let distance = euclidean_distance(
                &x.row(index).transpose(),
                &centroids.row(label).transpose(),
            )?;
            total += distance * distance;
        }

        Ok(total)
    }

    /// Counts the records assigned to each cluster.
    fn cluster_sizes(&self, labels: &[usize], num_clusters: usize) -> Vec<usize> {
        let mut sizes = vec![0; num_clusters];
        for &label in labels {
            if label < num_clusters {
                sizes[label] += 1;
            }
        }
        sizes
    }

    /// Computes the mean silhouette coefficient over all records.
    ///
    /// Runs over every pair of records, parallelized across the outer loop;
    /// datasets with fewer than two records score 0.
    fn silhouette_score(
        &self,
        x: &DMatrix<T>,
        labels: &[usize],
        num_clusters: usize,
    ) -> Result<f64, Box<dyn Error>> {
        if labels.len() != x.nrows() {
            return Err("Labels and records are of different sizes.".into());
        }

        let n = x.nrows();
        if n < 2 {
            return Ok(0.0);
        }

        let total: f64 = (0..n)
            .into_par_iter()
            .map(|i| {
                let label = labels[i];
                let mut same_cluster_distances = Vec::new();
                let mut other_cluster_distances: Vec<Vec<f64>> = vec![Vec::new(); num_clusters];

                for j in 0..n {
                    if i == j {
                        continue;
                    }

                    let mut sum = 0.0;
                    for col in 0..x.ncols() {
                        let diff = (x[(i, col)] - x[(j, col)]).to_f64().unwrap();
                        sum += diff * diff;
                    }
                    let distance = sum.sqrt();

                    if labels[j] == label {
                        same_cluster_distances.push(distance);
                    } else if labels[j] < num_clusters {
                        other_cluster_distances[labels[j]].push(distance);
                    }
                }

                let a = if same_cluster_distances.is_empty() {
                    0.0
                } else {
                    same_cluster_distances.iter().sum::<f64>()
                        / same_cluster_distances.len() as f64
                };

                let b = other_cluster_distances
                    .iter()
                    .filter(|distances| !distances.is_empty())
                    .map(|distances| distances.iter().sum::<f64>() / distances.len() as f64)
                    .fold(f64::INFINITY, f64::min);

                if b.is_infinite() || (a == 0.0 && b == 0.0) {
                    0.0
                } else {
                    (b - a) / a.max(b)
                }
            })
            .sum();

        Ok(total / n as f64)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::cluster::kmeans::KMeans;

    #[test]
    fn test_inertia_known_value() {
        let model = KMeans::<f64>::new();
        let x = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 2.0, 0.0]);
        let centroids = DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);

        let inertia = model.inertia(&x, &[0, 0], &centroids).unwrap();
        assert_relative_eq!(inertia, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inertia_mismatched_sizes() {
        let model = KMeans::<f64>::new();
        let x = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 2.0, 0.0]);
        let centroids = DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);

        let result = model.inertia(&x, &[0], &centroids);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Labels and records are of different sizes."
        );
    }

    #[test]
    fn test_cluster_sizes() {
        let model = KMeans::<f64>::new();
        let sizes = model.cluster_sizes(&[0, 1, 0, 2, 0], 3);
        assert_eq!(sizes, vec![3, 1, 1]);
        assert_eq!(sizes.iter().sum::<usize>(), 5);
    }

    #[test]
    fn test_silhouette_score_separated_clusters() {
        let model = KMeans::<f64>::new();
        let x = DMatrix::from_row_slice(
            4,
            2,
            &[0.0, 0.0, 0.0, 1.0, 10.0, 10.0, 10.0, 11.0],
        );
        let labels = [0, 0, 1, 1];

        let score = model.silhouette_score(&x, &labels, 2).unwrap();
        assert!(score > 0.5);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_silhouette_score_single_record() {
        let model = KMeans::<f64>::new();
        let x = DMatrix::from_row_slice(1, 2, &[0.0, 0.0]);
        let score = model.silhouette_score(&x, &[0], 1).unwrap();
        assert_eq!(score, 0.0);
    }
}
