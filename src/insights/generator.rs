//! Marketing insight generation
//!
//! Insight text is produced behind the `InsightGenerator` trait so that a
//! network-backed generative model can supply it in applications, while
//! tests and the demo binary use the deterministic template implementation.
use std::error::Error;

use crate::data::customer::Feature;
use crate::segmentation::Segmentation;

/// Descriptive statistics for one cluster, the only input an insight
/// generator receives.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub cluster_id: usize,
    pub size: usize,
    /// Fraction of the dataset assigned to this cluster.
    pub share: f64,
    /// Mean value per selected feature, in selection order.
    pub feature_means: Vec<(Feature, f64)>,
}

impl ClusterSummary {
    /// Builds one summary per cluster from a finished segmentation run.
    pub fn from_segmentation(segmentation: &Segmentation, features: &[Feature]) -> Vec<Self> {
        let total = segmentation.assignments.len();

        segmentation
            .clusters
            .iter()
            .enumerate()
            .map(|(cluster_id, cluster)| {
                let feature_means = features
                    .iter()
                    .enumerate()
                    .map(|(index, &feature)| (feature, cluster.centroid[index]))
                    .collect::<Vec<_>>();

                Self {
                    cluster_id,
                    size: cluster.members.len(),
                    share: cluster.members.len() as f64 / total as f64,
                    feature_means,
                }
            })
            .collect()
    }
}

/// A generated marketing insight for one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterInsight {
    pub cluster_id: usize,
    pub name: String,
    pub description: String,
    pub marketing_strategies: Vec<String>,
}

/// Capability interface: given cluster statistics, produce descriptive text.
pub trait InsightGenerator {
    fn generate(&self, summaries: &[ClusterSummary]) -> Result<Vec<ClusterInsight>, Box<dyn Error>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Low,
    Moderate,
    High,
}

impl Level {
    fn word(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Moderate => "moderate",
            Level::High => "high",
        }
    }
}

// Ratios against the across-cluster baseline that bound the moderate band.
const LOW_RATIO: f64 = 0.85;
const HIGH_RATIO: f64 = 1.15;

fn grade(value: f64, baseline: f64) -> Level {
    if baseline == 0.0 {
        return Level::Moderate;
    }
    let ratio = value / baseline;
    if ratio < LOW_RATIO {
        Level::Low
    } else if ratio > HIGH_RATIO {
        Level::High
    } else {
        Level::Moderate
    }
}

fn feature_phrase(feature: Feature) -> &'static str {
    match feature {
        Feature::Age => "age",
        Feature::AnnualIncome => "annual income",
        Feature::SpendingScore => "spending score",
    }
}

fn segment_name(levels: &[(Feature, Level)]) -> String {
    let level_of = |wanted: Feature| {
        levels
            .iter()
            .find(|(feature, _)| *feature == wanted)
            .map(|(_, level)| *level)
    };

    let income = level_of(Feature::AnnualIncome);
    let spending = level_of(Feature::SpendingScore);

    let name = match (income, spending) {
        (Some(Level::High), Some(Level::High)) => "Premium Enthusiasts",
        (Some(Level::High), Some(Level::Low)) => "Untapped Affluents",
        (Some(Level::Low), Some(Level::High)) => "Impulsive Spenders",
        (Some(Level::Low), Some(Level::Low)) => "Budget Conscious",
        (_, Some(Level::High)) => "Engaged Shoppers",
        (_, Some(Level::Low)) => "Window Shoppers",
        _ => "Mainstream Customers",
    };
    name.to_string()
}

fn segment_strategies(levels: &[(Feature, Level)]) -> Vec<String> {
    let level_of = |wanted: Feature| {
        levels
            .iter()
            .find(|(feature, _)| *feature == wanted)
            .map(|(_, level)| *level)
    };

    let mut strategies = Vec::new();

    match level_of(Feature::SpendingScore) {
        Some(Level::High) => {
            strategies.push("Reward loyalty with exclusive previews and early access offers.".to_string());
        }
        Some(Level::Low) => {
            strategies.push("Use targeted promotions to lift basket size.".to_string());
        }
        _ => {}
    }

    if level_of(Feature::AnnualIncome) == Some(Level::High)
        && level_of(Feature::SpendingScore) != Some(Level::High)
    {
        strategies.push("Position premium bundles to convert latent buying power.".to_string());
    }

    match level_of(Feature::Age) {
        Some(Level::Low) => {
            strategies.push("Prioritize social and mobile-first campaigns.".to_string());
        }
        Some(Level::High) => {
            strategies.push("Lean on email newsletters and service-led messaging.".to_string());
        }
        _ => {}
    }

    if strategies.is_empty() {
        strategies.push("Run A/B tests to refine messaging for this segment.".to_string());
    }

    strategies
}

/// Deterministic insight generator that grades each cluster's feature means
/// against the across-cluster baseline and fills in templated text.
pub struct TemplateInsightGenerator;

impl InsightGenerator for TemplateInsightGenerator {
    fn generate(&self, summaries: &[ClusterSummary]) -> Result<Vec<ClusterInsight>, Box<dyn Error>> {
        if summaries.is_empty() {
            return Err("There are no cluster summaries to describe.".into());
        }

        let num_features = summaries[0].feature_means.len();
        if summaries
            .iter()
            .any(|summary| summary.feature_means.len() != num_features)
        {
            return Err("Cluster summaries are of different sizes.".into());
        }

        // Size-weighted mean per feature, i.e. the dataset-wide baseline.
        let total_size: usize = summaries.iter().map(|summary| summary.size).sum();
        let baselines = (0..num_features)
            .map(|index| {
                summaries
                    .iter()
                    .map(|summary| summary.feature_means[index].1 * summary.size as f64)
                    .sum::<f64>()
                    / total_size as f64
            })
            .collect::<Vec<_>>();

        let insights = summaries
            .iter()
            .map(|summary| {
                let levels = summary
                    .feature_means
                    .iter()
                    .enumerate()
                    .map(|(index, &(feature, mean))| (feature, grade(mean, baselines[index])))
                    .collect::<Vec<_>>();

                let traits = levels
                    .iter()
                    .map(|(feature, level)| {
                        format!("{} {}", level.word(), feature_phrase(*feature))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");

                ClusterInsight {
                    cluster_id: summary.cluster_id,
                    name: segment_name(&levels),
                    description: format!(
                        "Customers with {} ({:.0}% of the dataset).",
                        traits,
                        summary.share * 100.0
                    ),
                    marketing_strategies: segment_strategies(&levels),
                }
            })
            .collect();

        Ok(insights)
    }
}
