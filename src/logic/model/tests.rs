use std::fs;
use std::path::PathBuf;

use super::*;
use crate::logic::classifier::{fit, ReplicatorClassifier};
use crate::logic::config::ReplicatorConfig;
use crate::logic::dataset::{Dataset, Header, Instance};
use crate::logic::error::ReplicatorError;
use crate::logic::events::NoopObserver;

/// 100 points on the line [t, 10 - t, t, 10 - t], t in [0, 10]
fn line_dataset() -> Dataset {
    let header = Header::numeric(4, &["normal", "anomaly"]);
    let instances = (0..100)
        .map(|k| {
            let t = 10.0 * k as f64 / 99.0;
            Instance::new(vec![t, 10.0 - t, t, 10.0 - t], Some(k % 2))
        })
        .collect();
    Dataset::with_instances(header, instances)
}

fn trained() -> (TrainedModel, TrainingReport) {
    fit(&line_dataset(), &ReplicatorConfig::default(), &mut NoopObserver).unwrap()
}

#[test]
fn test_end_to_end_detects_outlier() {
    let data = line_dataset();
    let classifier = ReplicatorClassifier::new(ReplicatorConfig::default()).unwrap();

    let report = classifier.build_classifier(&data).unwrap();
    assert!(report.converged());
    assert!(report.epochs < 1000);

    let held_out = Instance::unlabeled(vec![5.05, 4.95, 5.05, 4.95]);
    assert_eq!(
        classifier.distribution_for_instance(&data.header, &held_out).unwrap(),
        [1.0, 0.0]
    );

    let outlier = Instance::unlabeled(vec![1000.0, 4.95, 5.05, 4.95]);
    let score = classifier.score_instance(&data.header, &outlier).unwrap();
    assert!(score.is_anomaly());
    assert_eq!(score.distribution(), [0.0, 1.0]);
}

#[test]
fn test_scoring_is_idempotent() {
    let (model, _) = trained();
    let features = [3.0, 7.0, 3.0, 7.0];

    let first = score(&model, &features, DistanceThreshold::default()).unwrap();
    let second = score(&model, &features, DistanceThreshold::default()).unwrap();

    assert_eq!(first.distance.to_bits(), second.distance.to_bits());
    assert_eq!(first, second);
}

#[test]
fn test_missing_feature_is_rejected_not_scored() {
    let data = line_dataset();
    let classifier = ReplicatorClassifier::new(ReplicatorConfig::default()).unwrap();
    classifier.build_classifier(&data).unwrap();

    let missing = Instance::unlabeled(vec![f64::NAN, 4.95, 5.05, 4.95]);
    match classifier.distribution_for_instance(&data.header, &missing) {
        Err(ReplicatorError::InvalidDataset(reason)) => assert!(reason.contains("missing")),
        other => panic!("Expected InvalidDataset, got {:?}", other),
    }

    let (model, _) = trained();
    let infinite = [f64::INFINITY, 4.95, 5.05, 4.95];
    assert!(matches!(
        score(&model, &infinite, DistanceThreshold::default()),
        Err(ReplicatorError::InvalidDataset(_))
    ));
    assert!(model.reconstruct(&infinite).is_err());

    // Huge but finite values are still scored
    let extreme = score(&model, &[1e300, -1e300, 1e300, -1e300], DistanceThreshold::default()).unwrap();
    assert!(extreme.is_anomaly());
}

#[test]
fn test_same_seed_same_model() {
    let (a, report_a) = trained();
    let (b, report_b) = trained();

    assert_eq!(a.network, b.network);
    assert_eq!(report_a, report_b);
    // Identity is per training run
    assert_ne!(a.metadata.id, b.metadata.id);
}

#[test]
fn test_threshold_boundary_on_model_distance() {
    let (model, _) = trained();
    let features = [2.0, 8.0, 2.0, 8.0];

    let reconstruction = model.reconstruct(&features).unwrap();
    let distance = euclidean_distance(&reconstruction.input, &reconstruction.output).unwrap();
    assert!(distance > 0.0);

    let at = score(&model, &features, DistanceThreshold::new(distance).unwrap()).unwrap();
    assert_eq!(at.anomaly, 0.0);

    let below = score(&model, &features, DistanceThreshold::new(distance * 0.5).unwrap()).unwrap();
    assert_eq!(below.anomaly, 1.0);
}

#[test]
fn test_reconstruction_uses_fitted_normalization() {
    let (model, _) = trained();
    let reconstruction = model.reconstruct(&[0.0, 10.0, 10.0, 0.0]).unwrap();

    assert_eq!(reconstruction.input, vec![0.0, 1.0, 1.0, 0.0]);
    assert_eq!(reconstruction.output.len(), 4);
    assert!(reconstruction.output.iter().all(|o| *o > 0.0 && *o < 1.0));
}

#[test]
fn test_model_shape() {
    let (model, report) = trained();

    assert_eq!(model.row_size, 4);
    assert_eq!(model.topology().to_string(), "4 | 5 | 4");
    assert_eq!(model.metadata.epochs, report.epochs);
    assert_eq!(model.metadata.stop_reason, StopReason::Converged);
    assert!(model.validate().is_ok());
}

#[test]
fn test_concurrent_scoring() {
    let data = line_dataset();
    let config = ReplicatorConfig { max_epochs: 50, ..Default::default() };
    let classifier = ReplicatorClassifier::new(config).unwrap();
    classifier.build_classifier(&data).unwrap();

    let expected: Vec<AnomalyScore> = data
        .instances
        .iter()
        .map(|i| classifier.score_instance(&data.header, i).unwrap())
        .collect();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for (instance, want) in data.instances.iter().zip(&expected) {
                    let got = classifier.score_instance(&data.header, instance).unwrap();
                    assert_eq!(got, *want);
                }
            });
        }
    });
}

// ============================================================================
// STORAGE
// ============================================================================

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("model.json");
    let (model, _) = trained();

    save_model(&model, &path).unwrap();
    let loaded = load_model(&path).unwrap();

    assert_eq!(loaded, model);

    let features = [4.0, 6.0, 4.0, 6.0];
    let before = score(&model, &features, DistanceThreshold::default()).unwrap();
    let after = score(&loaded, &features, DistanceThreshold::default()).unwrap();
    assert_eq!(before.distance.to_bits(), after.distance.to_bits());
}

#[test]
fn test_restore_classifier_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let data = line_dataset();
    let (model, _) = trained();
    save_model(&model, &path).unwrap();

    let classifier =
        ReplicatorClassifier::with_model(ReplicatorConfig::default(), load_model(&path).unwrap()).unwrap();

    assert_eq!(classifier.to_string(), "Neural network: 4 | 5 | 4");
    let held_out = Instance::unlabeled(vec![5.05, 4.95, 5.05, 4.95]);
    assert_eq!(
        classifier.distribution_for_instance(&data.header, &held_out).unwrap(),
        [1.0, 0.0]
    );
}

#[test]
fn test_default_model_path() {
    let path = default_model_path();
    assert!(path.ends_with("replicator/model_v1.json"));
}

#[test]
fn test_output_model_path() {
    assert_eq!(output_model_path(Some("/tmp/m.json"), false), Some(PathBuf::from("/tmp/m.json")));
    assert_eq!(output_model_path(Some("/tmp/m.json"), true), Some(PathBuf::from("/tmp/m.json")));
    assert_eq!(output_model_path(Some("  "), true), Some(default_model_path()));
    assert_eq!(output_model_path(None, true), Some(default_model_path()));
    assert_eq!(output_model_path(None, false), None);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_model(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ReplicatorError::Io(_)));
}

#[test]
fn test_tampered_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let (model, _) = trained();
    save_model(&model, &path).unwrap();

    let mut envelope: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    envelope["model"]["row_size"] = serde_json::json!(5);
    fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

    match load_model(&path) {
        Err(ReplicatorError::CorruptModel(reason)) => assert!(reason.contains("checksum")),
        other => panic!("Expected CorruptModel, got {:?}", other),
    }
}

#[test]
fn test_inconsistent_model_is_rejected() {
    let (mut model, _) = trained();
    model.row_size = 3;
    assert!(matches!(model.validate(), Err(ReplicatorError::CorruptModel(_))));

    let (mut model, _) = trained();
    model.network.output_bias[0] = f64::NAN;
    assert!(matches!(model.validate(), Err(ReplicatorError::CorruptModel(_))));
}

#[test]
fn test_garbage_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, b"not json").unwrap();

    assert!(matches!(load_model(&path), Err(ReplicatorError::Serialization(_))));
}
