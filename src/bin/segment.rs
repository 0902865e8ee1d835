use std::error::Error;

use segmenta::cluster::kmeans::KMeans;
use segmenta::data::customer::{load_customers, project_all, Customer, Feature};
use segmenta::data::dataset::Dataset;
use segmenta::insights::generator::{ClusterSummary, InsightGenerator, TemplateInsightGenerator};
use segmenta::metrics::clustering::ClusteringMetrics;
use segmenta::segmentation::segment_customers;

fn report_model_quality(
    dataset: &Dataset<f64>,
    num_clusters: usize,
) -> Result<String, Box<dyn Error>> {
    let mut model = KMeans::with_params(Some(num_clusters), None, None)?;
    println!("{}", model.fit(dataset, Some(10))?);

    let labels = model.labels().ok_or("The model has not been fitted.")?.clone();
    let centroids = model
        .centroids()
        .ok_or("The model has not been fitted.")?
        .clone();

    let inertia = model.inertia(&dataset.x, &labels, &centroids)?;
    let silhouette = model.silhouette_score(&dataset.x, &labels, num_clusters)?;

    Ok(format!(
        "Inertia: {:.2}, silhouette score: {:.3}",
        inertia, silhouette
    ))
}

fn report_segments(
    customers: &[Customer],
    features: &[Feature],
    num_clusters: usize,
) -> Result<(), Box<dyn Error>> {
    let segmentation = segment_customers(customers, features, num_clusters, None)?;

    for (index, cluster) in segmentation.clusters.iter().enumerate() {
        let centroid = cluster
            .centroid
            .iter()
            .map(|value| format!("{:.1}", value))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "Cluster {}: {} members, centroid [{}]",
            index,
            cluster.members.len(),
            centroid
        );
    }

    let summaries = ClusterSummary::from_segmentation(&segmentation, features);
    let insights = TemplateInsightGenerator.generate(&summaries)?;
    for insight in insights {
        println!("[{}] {}: {}", insight.cluster_id, insight.name, insight.description);
        for strategy in &insight.marketing_strategies {
            println!("  - {}", strategy);
        }
    }

    Ok(())
}

fn main() {
    let customers = match load_customers("datasets/mall_customers.csv", true) {
        Ok(customers) => {
            println!("Loaded {} customers", customers.len());
            customers
        }
        Err(err) => panic!("{}", err),
    };

    let features = [Feature::AnnualIncome, Feature::SpendingScore];
    let num_clusters = 5;

    let dataset = match project_all(&customers, &features) {
        Ok(dataset) => dataset,
        Err(err) => panic!("{}", err),
    };

    println!("{:?}", report_model_quality(&dataset, num_clusters));
    println!("{:?}", report_segments(&customers, &features, num_clusters));
}
