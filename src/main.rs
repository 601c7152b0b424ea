//! Replicator - Command Line Entry Point
//!
//! `replicator <train.csv> [score.csv]`
//!
//! Trains on the first file and prints one JSON line per scored row. Rows of
//! the second file are parsed against the training columns and scored when
//! given, otherwise the training rows are.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use replicator_core::constants::{APP_NAME, APP_VERSION, ENV_MODEL_PATH, ENV_SAVE_MODEL};
use replicator_core::logic::dataset::{load_csv, load_csv_with_header, AttributeKind, Dataset};
use replicator_core::logic::model::{output_model_path, save_model};
use replicator_core::{ReplicatorClassifier, ReplicatorConfig, ReplicatorError};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            // Dimension mismatches are defects in the calling layer
            let fatal = e
                .downcast_ref::<ReplicatorError>()
                .map(|err| err.is_fatal())
                .unwrap_or(false);
            if fatal {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (train_path, score_path) = match args.as_slice() {
        [train] => (PathBuf::from(train), None),
        [train, score] => (PathBuf::from(train), Some(PathBuf::from(score))),
        _ => bail!("usage: replicator <train.csv> [score.csv]"),
    };

    let config = ReplicatorConfig::from_env();
    log::info!("Options: {}", config.options().join(" "));

    let classifier = ReplicatorClassifier::new(config)?;
    let train = load_csv(&train_path)
        .with_context(|| format!("failed to load {}", train_path.display()))?;

    let report = classifier.build_classifier(&train)?;
    log::info!("{} ({} epochs, error {:.6})", classifier, report.epochs, report.final_error);

    let explicit = env::var(ENV_MODEL_PATH).ok();
    let save_requested = env::var(ENV_SAVE_MODEL)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if let Some(model_path) = output_model_path(explicit.as_deref(), save_requested) {
        if let Some(model) = classifier.model() {
            save_model(&model, &model_path)
                .with_context(|| format!("failed to save model to {}", model_path.display()))?;
        }
    }

    let scored = match &score_path {
        Some(path) => load_csv_with_header(path, &train.header)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => train,
    };

    print_scores(&classifier, &scored)
}

/// One JSON object per row
fn print_scores(classifier: &ReplicatorClassifier, scored: &Dataset) -> Result<()> {
    let mut anomalies = 0usize;

    for (row, instance) in scored.instances.iter().enumerate() {
        let score = classifier
            .score_instance(&scored.header, instance)
            .with_context(|| format!("failed to score row {}", row))?;
        if score.is_anomaly() {
            anomalies += 1;
        }

        let label = match (&scored.header.class_attribute().kind, instance.label) {
            (AttributeKind::Nominal(values), Some(index)) => values.get(index).cloned(),
            _ => None,
        };

        let line = serde_json::json!({
            "row": row,
            "label": label,
            "distance": score.distance,
            "normalcy": score.normalcy,
            "anomaly": score.anomaly,
        });
        println!("{}", line);
    }

    log::info!("Scored {} rows, {} flagged as anomalies", scored.len(), anomalies);
    Ok(())
}
