//! K-Means Clustering
use nalgebra::{DMatrix, RowDVector};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::error::Error;

use crate::cluster::distance::euclidean_distance;
use crate::data::dataset::{Dataset, RealNumber};
use crate::metrics::clustering::ClusteringMetrics;

const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Centroid seeding strategy.
///
/// `FirstK` takes the first k records in dataset order and is the default:
/// repeated runs over the same input produce identical output. `RandomSeed`
/// picks k distinct records under the given seed; there is no unseeded
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMethod {
    FirstK,
    RandomSeed(u64),
}

/// Terminal state of a fit run. `MaxIterationsReached` is a best-effort
/// result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    Converged,
    MaxIterationsReached,
}

/// K-Means clustering over a projected dataset.
///
/// # Type Parameters
///
/// * `T`: The numeric type used for calculations. Must implement the `RealNumber` trait.
///
/// # Examples
///
/// ```
/// use segmenta::cluster::kmeans::KMeans;
/// use segmenta::data::dataset::Dataset;
/// use nalgebra::DMatrix;
///
/// let x = DMatrix::from_row_slice(4, 2, &[15.0, 39.0, 15.0, 81.0, 16.0, 6.0, 16.0, 77.0]);
/// let dataset = Dataset::new(x);
///
/// let mut model = KMeans::<f64>::with_params(Some(2), None, None).unwrap();
/// model.fit(&dataset, None).unwrap();
///
/// assert_eq!(model.labels().unwrap().len(), 4);
/// ```
#[derive(Debug)]
pub struct KMeans<T: RealNumber> {
    num_clusters: usize,
    max_iterations: usize,
    init: InitMethod,
    centroids: Option<DMatrix<T>>,
    labels: Option<Vec<usize>>,
    status: Option<FitStatus>,
    iterations_run: usize,
}

impl<T: RealNumber> Default for KMeans<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealNumber> ClusteringMetrics<T> for KMeans<T> {}

impl<T: RealNumber> KMeans<T> {
    pub fn new() -> Self {
        Self {
            num_clusters: 2,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            init: InitMethod::FirstK,
            centroids: None,
            labels: None,
            status: None,
            iterations_run: 0,
        }
    }

    /// Creates a model with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `num_clusters`: The number of clusters k. Defaults to 2.
    /// * `max_iterations`: The iteration cap. Defaults to 100.
    /// * `init`: The centroid seeding strategy. Defaults to `InitMethod::FirstK`.
    ///
    /// # Errors
    ///
    /// An error will be returned if `num_clusters` or `max_iterations` is 0.
    pub fn with_params(
        num_clusters: Option<usize>,
        max_iterations: Option<usize>,
        init: Option<InitMethod>,
    ) -> Result<Self, Box<dyn Error>> {
        if num_clusters.is_some_and(|k| k == 0) {
            return Err("The number of clusters must be greater than 0.".into());
        }
        if max_iterations.is_some_and(|cap| cap == 0) {
            return Err("The number of iterations must be greater than 0.".into());
        }

        Ok(Self {
            num_clusters: num_clusters.unwrap_or(2),
            max_iterations: max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            init: init.unwrap_or(InitMethod::FirstK),
            centroids: None,
            labels: None,
            status: None,
            iterations_run: 0,
        })
    }

    pub fn num_clusters(&self) -> usize {
        self.num_clusters
    }

    /// Final centroids, one row per cluster. `None` until fitted.
    pub fn centroids(&self) -> Option<&DMatrix<T>> {
        self.centroids.as_ref()
    }

    /// Cluster index per record, aligned with the input rows. `None` until fitted.
    pub fn labels(&self) -> Option<&Vec<usize>> {
        self.labels.as_ref()
    }

    pub fn status(&self) -> Option<FitStatus> {
        self.status
    }

    pub fn iterations_run(&self) -> usize {
        self.iterations_run
    }

    /// Runs assignment and update steps until assignments stabilize or the
    /// iteration cap is reached, then freezes centroids, labels, and status
    /// on the model.
    ///
    /// # Arguments
    ///
    /// * `dataset`: The projected records, one row per record.
    /// * `progress`: The number of iterations at which to display progress
    ///   information. If `None`, no progress information will be displayed.
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing a summary message for either terminal
    /// state; reaching the iteration cap is not an error.
    ///
    /// # Errors
    ///
    /// An error will be returned if:
    /// * The number of iterations for progress visualization is 0.
    /// * The dataset is empty or holds fewer records than clusters.
    pub fn fit(
        &mut self,
        dataset: &Dataset<T>,
        progress: Option<usize>,
    ) -> Result<String, Box<dyn Error>> {
        if progress.is_some_and(|steps| steps == 0) {
            return Err(
                "The number of steps for progress visualization must be greater than 0.".into(),
            );
        }
        if !dataset.is_not_empty() {
            return Err("The dataset must not be empty.".into());
        }
        if dataset.nrows() < self.num_clusters {
            return Err("The dataset must contain at least as many records as clusters.".into());
        }

        let mut centroids = self.init_centroids(&dataset.x);
        let mut labels = Vec::new();

        for iteration in 1..=self.max_iterations {
            let new_labels = Self::assign(&dataset.x, &centroids)?;
            let unchanged = new_labels == labels;

            centroids = Self::update(&dataset.x, &new_labels, &centroids);
            labels = new_labels;

            if progress.is_some_and(|steps| iteration % steps == 0) {
                println!("Iteration: {}", iteration);
                println!(
                    "Inertia: {}",
                    self.inertia(&dataset.x, &labels, &centroids)?
                );
            }

            if unchanged {
                self.centroids = Some(centroids);
                self.labels = Some(labels);
                self.status = Some(FitStatus::Converged);
                self.iterations_run = iteration;
                return Ok(format!("Converged after {} iterations.", iteration));
            }
        }

        self.centroids = Some(centroids);
        self.labels = Some(labels);
        self.status = Some(FitStatus::MaxIterationsReached);
        self.iterations_run = self.max_iterations;
        Ok("Reached maximum iterations without converging.".into())
    }

    fn init_centroids(&self, x: &DMatrix<T>) -> DMatrix<T> {
        let indices = match self.init {
            InitMethod::FirstK => (0..self.num_clusters).collect::<Vec<_>>(),
            InitMethod::RandomSeed(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut indices = (0..x.nrows()).collect::<Vec<_>>();
                indices.shuffle(&mut rng);
                indices.truncate(self.num_clusters);
                indices
            }
        };

        let rows = indices
            .iter()
            .map(|&index| x.row(index))
            .collect::<Vec<_>>();
        DMatrix::from_rows(&rows)
    }

    fn assign(x: &DMatrix<T>, centroids: &DMatrix<T>) -> Result<Vec<usize>, Box<dyn Error>> {
        let mut labels = Vec::with_capacity(x.nrows());

        for i in 0..x.nrows() {
            let point = x.row(i).transpose();

            // Ties keep the lowest centroid index.
            let mut best_index = 0;
            let mut best_distance = euclidean_distance(&point, &centroids.row(0).transpose())?;
            for j in 1..centroids.nrows() {
                let distance = euclidean_distance(&point, &centroids.row(j).transpose())?;
                if distance < best_distance {
                    best_distance = distance;
                    best_index = j;
                }
            }

            labels.push(best_index);
        }

        Ok(labels)
    }

    fn update(x: &DMatrix<T>, labels: &[usize], previous: &DMatrix<T>) -> DMatrix<T> {
        let mut rows = Vec::with_capacity(previous.nrows());

        for cluster in 0..previous.nrows() {
            let members = labels
                .iter()
                .enumerate()
                .filter(|&(_, &label)| label == cluster)
                .map(|(index, _)| index)
                .collect::<Vec<_>>();

            // A cluster with no members keeps its previous centroid.
            if members.is_empty() {
                rows.push(previous.row(cluster).into_owned());
                continue;
            }

            let mut mean = RowDVector::from_element(x.ncols(), T::from_f64(0.0).unwrap());
            for &index in &members {
                for col in 0..x.ncols() {
                    mean[col] += x[(index, col)];
                }
            }
            for col in 0..x.ncols() {
                mean[col] /= T::from_usize(members.len()).unwrap();
            }
            rows.push(mean);
        }

        DMatrix::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn income_score_dataset() -> Dataset<f64> {
        let x = DMatrix::from_row_slice(
            4,
            2,
            &[15.0, 39.0, 16.0, 81.0, 17.0, 6.0, 18.0, 77.0],
        );
        Dataset::new(x)
    }

    #[test]
    fn test_new_defaults() {
        let model = KMeans::<f64>::new();
        assert_eq!(model.num_clusters(), 2);
        assert!(model.centroids().is_none());
        assert!(model.labels().is_none());
        assert!(model.status().is_none());
    }

    #[test]
    fn test_with_params_zero_clusters() {
        let model = KMeans::<f64>::with_params(Some(0), None, None);
        assert!(model.is_err());
        assert_eq!(
            model.unwrap_err().to_string(),
            "The number of clusters must be greater than 0."
        );
    }

    #[test]
    fn test_with_params_zero_iterations() {
        let model = KMeans::<f64>::with_params(Some(2), Some(0), None);
        assert!(model.is_err());
        assert_eq!(
            model.unwrap_err().to_string(),
            "The number of iterations must be greater than 0."
        );
    }

    #[test]
    fn test_fit_two_clusters_on_income_score_plane() {
        let dataset = income_score_dataset();
        let mut model = KMeans::with_params(Some(2), None, None).unwrap();

        let result = model.fit(&dataset, None).unwrap();
        assert_eq!(result, "Converged after 2 iterations.");
        assert_eq!(model.status(), Some(FitStatus::Converged));

        let labels = model.labels().unwrap();
        assert_eq!(labels, &vec![0, 1, 0, 1]);

        let mut distinct = labels.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 2);

        let centroids = model.centroids().unwrap();
        let expected = DMatrix::from_row_slice(2, 2, &[16.0, 22.5, 17.0, 79.0]);
        assert_relative_eq!(centroids.clone(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_single_cluster_centroid_is_dataset_mean() {
        let dataset = income_score_dataset();
        let mut model = KMeans::with_params(Some(1), None, None).unwrap();
        model.fit(&dataset, None).unwrap();

        assert_eq!(model.labels().unwrap(), &vec![0, 0, 0, 0]);

        let centroids = model.centroids().unwrap();
        let expected = DMatrix::from_row_slice(1, 2, &[16.5, 50.75]);
        assert_relative_eq!(centroids.clone(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_one_cluster_per_record() {
        let dataset = income_score_dataset();
        let mut model = KMeans::with_params(Some(4), None, None).unwrap();
        model.fit(&dataset, None).unwrap();

        // Distinct records seeded one per cluster stay with their seed.
        assert_eq!(model.labels().unwrap(), &vec![0, 1, 2, 3]);
        assert_eq!(model.status(), Some(FitStatus::Converged));
        assert_relative_eq!(
            model.centroids().unwrap().clone(),
            dataset.x,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_fit_is_deterministic() {
        let dataset = income_score_dataset();

        let mut first = KMeans::with_params(Some(2), None, None).unwrap();
        let mut second = KMeans::with_params(Some(2), None, None).unwrap();
        first.fit(&dataset, None).unwrap();
        second.fit(&dataset, None).unwrap();

        assert_eq!(first.labels(), second.labels());
        assert_eq!(first.centroids(), second.centroids());
    }

    #[test]
    fn test_fit_is_deterministic_with_seeded_init() {
        let x = DMatrix::from_row_slice(
            6,
            2,
            &[
                15.0, 39.0, 16.0, 81.0, 17.0, 6.0, 18.0, 77.0, 19.0, 40.0, 20.0, 76.0,
            ],
        );
        let dataset = Dataset::new(x);

        let mut first =
            KMeans::with_params(Some(2), None, Some(InitMethod::RandomSeed(42))).unwrap();
        let mut second =
            KMeans::with_params(Some(2), None, Some(InitMethod::RandomSeed(42))).unwrap();
        first.fit(&dataset, None).unwrap();
        second.fit(&dataset, None).unwrap();

        assert_eq!(first.labels(), second.labels());
        assert_eq!(first.centroids(), second.centroids());
    }

    #[test]
    fn test_fit_empty_dataset() {
        let dataset = Dataset::new(DMatrix::<f64>::from_row_slice(0, 2, &[]));
        let mut model = KMeans::new();
        let result = model.fit(&dataset, None);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "The dataset must not be empty."
        );
    }

    #[test]
    fn test_fit_more_clusters_than_records() {
        let dataset = Dataset::new(DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]));
        let mut model = KMeans::with_params(Some(3), None, None).unwrap();
        let result = model.fit(&dataset, None);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "The dataset must contain at least as many records as clusters."
        );
    }

    #[test]
    fn test_fit_with_progress_set_to_zero() {
        let dataset = income_score_dataset();
        let mut model = KMeans::with_params(Some(2), None, None).unwrap();
        let result = model.fit(&dataset, Some(0));
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "The number of steps for progress visualization must be greater than 0."
        );
    }

    #[test]
    fn test_fit_max_iterations_reached() {
        let x = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 0.0, 0.0, 10.0, 10.0]);
        let dataset = Dataset::new(x);

        let mut model = KMeans::with_params(Some(2), Some(1), None).unwrap();
        let result = model.fit(&dataset, None).unwrap();

        assert_eq!(result, "Reached maximum iterations without converging.");
        assert_eq!(model.status(), Some(FitStatus::MaxIterationsReached));
        assert_eq!(model.iterations_run(), 1);

        // Both seeds start at (0, 0); every record ties to the lowest index,
        // so cluster 1 is empty and must keep its seed centroid untouched.
        assert_eq!(model.labels().unwrap(), &vec![0, 0, 0]);
        let centroids = model.centroids().unwrap();
        let expected = DMatrix::from_row_slice(2, 2, &[10.0 / 3.0, 10.0 / 3.0, 0.0, 0.0]);
        assert_relative_eq!(centroids.clone(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_assignment_ties_break_to_lowest_index() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 1.0, 1.0, 3.0, 3.0]);
        let dataset = Dataset::new(x);

        // Seeds are identical, and (3, 3) is equidistant to both.
        let mut model = KMeans::with_params(Some(2), Some(1), None).unwrap();
        model.fit(&dataset, None).unwrap();
        assert_eq!(model.labels().unwrap(), &vec![0, 0, 0]);
    }
}
