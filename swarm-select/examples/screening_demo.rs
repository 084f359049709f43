//! Screening Demo
//!
//! Selects informative features, blends two probability models and tunes a
//! parameter box, printing each result as a JSON report.
//!
//! Run with `RUST_LOG=swarm_select_core=debug` to see per-iteration events.

use swarm_select::prelude::*;
use tracing_subscriber::EnvFilter;

fn screening_data() -> (FeatureMatrix, Vec<Label>) {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for i in 0..60usize {
        let label = (i % 2) as Label;
        rows.push(vec![
            ((i * 13) % 11) as f64 / 2.0,
            label as f64 * 2.5 + ((i * 7) % 5) as f64 * 0.2,
            ((i * 31) % 17) as f64 / 4.0,
        ]);
        labels.push(label);
    }
    (FeatureMatrix::from_rows(&rows).expect("rectangular rows"), labels)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("swarm-select Screening Demo");
    println!("===========================");

    let registry = ModelRegistry::new()
        .with_model("random_forest", LogisticModel::new(vec![0.4, 1.1, -0.2], -1.0))?
        .with_model("svm", LogisticModel::new(vec![-0.1, 0.6, 0.3], -0.5))?;
    let engine = ScreeningEngine::new(EngineConfig::default(), registry);

    let (features, labels) = screening_data();
    let names: Vec<String> = ["age", "biomarker", "bmi"].map(String::from).to_vec();
    let selection = engine.select_features(
        &features,
        &labels,
        ClassifierScorer::new(NearestCentroid::new),
        Some(names.as_slice()),
    )?;
    println!("\nFeature selection:");
    println!("{}", SearchReport::from(&selection).to_json_pretty()?);

    let blend = engine.blend(features.row(1))?;
    println!("\nModel blend:");
    println!("{}", SearchReport::from(&blend).to_json_pretty()?);

    let tuned = engine.minimize(&[(0.0, 10.0), (-5.0, 5.0)], |x: &[f64]| {
        Ok::<_, String>((x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2))
    })?;
    println!("\nParameter search:");
    println!("{}", SearchReport::from(&tuned).to_json_pretty()?);

    Ok(())
}
