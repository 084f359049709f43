//! End-to-end search scenarios across all three modes.

use rand::rngs::StdRng;
use rand::SeedableRng;

use swarm_select_core::bounded::BoundedSearch;
use swarm_select_core::config::SwarmConfig;
use swarm_select_core::dataset::{FeatureMatrix, Label};
use swarm_select_core::ensemble::{blend_fitness, normalize, BlendScore, EnsembleWeightSearch};
use swarm_select_core::feature_subset::{scorer_fn, FeatureSubsetSearch, SubsetSplit};

fn four_feature_data() -> (FeatureMatrix, Vec<Label>) {
    let rows: Vec<[f64; 4]> = (0..20)
        .map(|i| {
            let x = i as f64;
            [x, x * 0.5, (i % 2) as f64, 1.0]
        })
        .collect();
    let labels = (0..20).map(|i| (i % 2) as Label).collect();
    (FeatureMatrix::from_rows(&rows).unwrap(), labels)
}

fn config(particles: usize, iterations: usize) -> SwarmConfig {
    SwarmConfig::builder()
        .particles(particles)
        .iterations(iterations)
        .build()
        .unwrap()
}

#[test]
fn finds_the_only_useful_feature() {
    let (features, labels) = four_feature_data();
    let scorer = scorer_fn(|split: &SubsetSplit<'_>| {
        Ok::<f64, String>(if split.selected.contains(&2) { 1.0 } else { 0.0 })
    });
    let search = FeatureSubsetSearch::new(&features, &labels, scorer).unwrap();

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = search.search_with_rng(&config(10, 20), &mut rng).unwrap();
        assert_eq!(result.mask.len(), 4);
        assert!(result.mask[2], "seed {seed}: feature 2 not selected");
        assert_eq!(result.score, 1.0);
        assert_eq!(result.mask_bits()[2], 1);
    }
}

#[test]
fn masks_always_select_at_least_one_feature() {
    let (features, labels) = four_feature_data();
    // Prefer the smallest subsets, pushing the swarm toward empty masks.
    let scorer = scorer_fn(|split: &SubsetSplit<'_>| {
        Ok::<f64, String>(1.0 / split.selected.len() as f64)
    });
    let search = FeatureSubsetSearch::new(&features, &labels, scorer).unwrap();

    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = search.search_with_rng(&config(6, 15), &mut rng).unwrap();
        assert_eq!(result.mask.len(), 4);
        assert!(result.mask.iter().any(|&m| m));
        assert!(!result.selected().is_empty());
    }
}

#[test]
fn failing_scorer_still_terminates() {
    let (features, labels) = four_feature_data();
    let scorer = scorer_fn(|_: &SubsetSplit<'_>| Err::<f64, _>("model fit raised"));
    let search = FeatureSubsetSearch::new(&features, &labels, scorer).unwrap();

    let mut rng = StdRng::seed_from_u64(99);
    let result = search.search_with_rng(&config(10, 20), &mut rng).unwrap();
    assert_eq!(result.score, 0.0);
    assert_eq!(result.outcome.iterations, 20);
    assert_eq!(result.outcome.failed_evaluations, 200);
    assert_eq!(result.mask.len(), 4);
    assert!(result.mask.iter().any(|&m| m));
}

#[test]
fn selected_names_follow_mask() {
    let (features, labels) = four_feature_data();
    let scorer = scorer_fn(|split: &SubsetSplit<'_>| {
        Ok::<f64, String>(if split.selected == [2] { 1.0 } else { 0.5 })
    });
    let search = FeatureSubsetSearch::new(&features, &labels, scorer)
        .unwrap()
        .with_feature_names(["age", "score_sum", "A3_Score", "bias"])
        .unwrap();

    let mut rng = StdRng::seed_from_u64(17);
    let result = search.search_with_rng(&config(20, 30), &mut rng).unwrap();
    let names = result.selected_names.clone().unwrap();
    assert_eq!(names.len(), result.selected().len());
    if result.score == 1.0 {
        assert_eq!(names, vec!["A3_Score".to_string()]);
    }
}

#[test]
fn global_best_never_decreases() {
    let outputs = [0.73, 0.41, 0.66];
    let search = EnsembleWeightSearch::new(&outputs).unwrap();
    let (features, labels) = four_feature_data();
    let scorer = scorer_fn(|split: &SubsetSplit<'_>| {
        Ok::<f64, String>(split.selected.iter().map(|&i| i as f64).sum::<f64>() / 6.0)
    });
    let subset = FeatureSubsetSearch::new(&features, &labels, scorer).unwrap();

    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let blended = search.search_with_rng(&config(8, 20), &mut rng).unwrap();
        assert!(blended.outcome.history.windows(2).all(|w| w[1] >= w[0]));

        let selected = subset.search_with_rng(&config(8, 20), &mut rng).unwrap();
        assert!(selected.outcome.history.windows(2).all(|w| w[1] >= w[0]));
    }
}

#[test]
fn weights_are_normalized_and_non_negative() {
    let outputs = [0.2, 0.95, 0.51, 0.33];
    let search = EnsembleWeightSearch::new(&outputs).unwrap();

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = search
            .search_with_rng(&SwarmConfig::weight_search(), &mut rng)
            .unwrap();
        assert_eq!(result.weights.len(), 4);
        assert!(result.weights.iter().all(|&w| w >= 0.0));
        assert!((result.weights.iter().sum::<f64>() - 1.0).abs() < 1e-6);

        let mut again = result.weights.clone();
        normalize(&mut again);
        for (a, b) in again.iter().zip(&result.weights) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}

#[test]
fn confident_model_dominates_blend() {
    let outputs = [0.9, 0.1];
    let search = EnsembleWeightSearch::new(&outputs).unwrap();
    let uniform = blend_fitness(&outputs, &[0.5, 0.5]);

    // The heuristic has a weaker local optimum near weights (0, 1), so a small
    // swarm occasionally settles there; a large swarm rarely does.
    let mut favors_confident = 0;
    for seed in 0..40 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = search.search_with_rng(&config(50, 20), &mut rng).unwrap();
        assert!(result.fitness > uniform);
        if result.weights[0] > result.weights[1] {
            favors_confident += 1;
        }
    }
    assert!(favors_confident >= 28, "only {favors_confident}/40 runs favored 0.9");
}

#[test]
fn equal_outputs_have_no_preferred_model() {
    let outputs = [0.5, 0.5, 0.5];
    let search = EnsembleWeightSearch::new(&outputs).unwrap();
    let mut dominant = [0usize; 3];

    for seed in 0..60 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = search.search_with_rng(&config(10, 20), &mut rng).unwrap();

        let score = BlendScore::compute(&outputs, &result.weights);
        assert!(score.confidence < 1e-12);
        assert!((result.fitness - 0.1 * score.diversity).abs() < 1e-9);

        let top = result
            .weights
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        dominant[top] += 1;
    }

    assert!(
        dominant.iter().all(|&count| count >= 5),
        "dominant model counts skewed: {dominant:?}"
    );
}

#[test]
fn bounded_search_finds_hyperparameter_optimum() {
    // Accuracy peaks at (n_estimators = 200, max_depth = 12).
    let accuracy = |x: &[f64]| {
        let a = (x[0] - 200.0) / 490.0;
        let b = (x[1] - 12.0) / 25.0;
        Ok::<f64, String>(1.0 - a * a - b * b)
    };
    let search = BoundedSearch::maximize([(10.0, 500.0), (5.0, 30.0)], accuracy).unwrap();

    let mut rng = StdRng::seed_from_u64(21);
    let result = search.search_with_rng(&config(20, 60), &mut rng).unwrap();
    assert!((result.position[0] - 200.0).abs() < 25.0);
    assert!((result.position[1] - 12.0).abs() < 2.0);
    assert!(result.score > 0.99);
    assert_eq!(result.objective_value, result.score);
}

#[test]
fn bounded_minimize_reports_cost() {
    let cost = |x: &[f64]| Ok::<f64, String>((x[0] - 0.25).powi(2) + 0.1);
    let search = BoundedSearch::minimize([(-3.0, 2.0)], cost).unwrap();

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = search.search_with_rng(&config(15, 40), &mut rng).unwrap();
        assert!((-3.0..=2.0).contains(&result.position[0]));
        assert!(result.objective_value >= 0.1);
        assert!(result.objective_value < 0.11);
        assert_eq!(result.score, -result.objective_value);
    }
}

#[test]
fn seeded_config_is_reproducible() {
    let outputs = [0.6, 0.35];
    let search = EnsembleWeightSearch::new(&outputs).unwrap();
    let seeded = SwarmConfig::builder().seed(1234).build().unwrap();

    let first = search.search(&seeded).unwrap();
    let second = search.search(&seeded).unwrap();
    assert_eq!(first, second);
}
