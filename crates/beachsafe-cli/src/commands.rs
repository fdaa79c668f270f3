//! Subcommand handlers

use crate::config::AppConfig;
use anyhow::Context;
use beachsafe_classifiers::crowd::{estimate_crowd, CrowdEstimate};
use beachsafe_classifiers::{
    load_dataset, survey_beaches, train as fit, BeachConditions, BeachStatus, SafetyPredictor,
    TrainingReport,
};
use beachsafe_core::{Column, SafetyLabel};
use beachsafe_telemetry::{summarize_trends, DailyTrend, PredictionLog, PredictionRecord};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Load the predictor, failing fast when the artifacts are unusable
pub fn load_predictor(config: &AppConfig) -> anyhow::Result<SafetyPredictor> {
    SafetyPredictor::load(config.artifacts()).with_context(|| {
        format!(
            "cannot load model artifacts from {} and {}; run `beachsafe train` first",
            config.artifacts().model_path.display(),
            config.artifacts().encoders_path.display()
        )
    })
}

/// Train on the configured dataset and save both artifacts
pub fn train(
    config: &AppConfig,
    dataset: Option<PathBuf>,
    trees: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<TrainingReport> {
    let mut training = config.classifier.training.clone();
    if let Some(dataset) = dataset {
        training.dataset_path = dataset;
    }
    if let Some(trees) = trees {
        training.n_estimators = trees;
    }
    if let Some(seed) = seed {
        training.random_state = seed;
    }

    let records = load_dataset(&training.dataset_path)?;
    let report = fit(&records, &training)?;
    report.artifacts.save(config.artifacts())?;
    Ok(report)
}

pub fn print_training_report(report: &TrainingReport, config: &AppConfig) {
    println!(
        "Trained {} trees on {} rows",
        report.artifacts.model.forest.n_estimators(),
        report.train_rows
    );
    println!("  Train accuracy:   {:.1}%", report.train_accuracy * 100.0);
    match report.test_accuracy {
        Some(accuracy) => println!(
            "  Holdout accuracy: {:.1}% ({} rows)",
            accuracy * 100.0,
            report.test_rows
        ),
        None => println!("  Holdout accuracy: n/a (no rows held out)"),
    }
    println!("  Model:    {}", config.artifacts().model_path.display());
    println!("  Encoders: {}", config.artifacts().encoders_path.display());
}

/// Inputs of a single prediction
#[derive(Debug, Clone)]
pub struct PredictRequest {
    pub beach: String,
    pub weather: String,
    pub crowd: Option<String>,
    pub tide: String,
    pub hazard: String,
    /// Time used for the crowd estimate and the log entry
    pub at: NaiveDateTime,
    pub log: bool,
}

/// Result of a single prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictOutcome {
    pub beach: String,
    pub weather: String,
    pub crowd: String,
    pub crowd_estimated: bool,
    pub tide: String,
    pub hazard: String,
    pub safety: SafetyLabel,
    pub advisory: &'static str,
    pub confidence: Option<f32>,
    pub fallback: bool,
}

pub fn predict(
    config: &AppConfig,
    predictor: &SafetyPredictor,
    request: PredictRequest,
) -> anyhow::Result<PredictOutcome> {
    let (crowd, crowd_estimated) = match request.crowd {
        Some(crowd) => (crowd, false),
        None => {
            let estimate = estimate_crowd(&request.beach, request.at);
            (estimate.level.as_str().to_string(), true)
        }
    };

    let conditions = BeachConditions::new(
        request.beach,
        request.weather,
        crowd,
        request.tide,
        request.hazard,
    );
    let prediction = predictor.predict(&conditions);

    if request.log {
        let log = PredictionLog::from_config(&config.history);
        log.append(&PredictionRecord {
            timestamp: request.at,
            beach: conditions.beach.clone(),
            weather: conditions.weather.clone(),
            crowd: conditions.crowd.clone(),
            tide: conditions.tide.clone(),
            hazard: conditions.hazard.clone(),
            safety: prediction.label,
        })
        .context("failed to record prediction")?;
    }

    Ok(PredictOutcome {
        advisory: prediction.label.advisory(),
        confidence: prediction.confidence(),
        fallback: prediction.is_fallback(),
        safety: prediction.label,
        beach: conditions.beach,
        weather: conditions.weather,
        crowd: conditions.crowd,
        crowd_estimated,
        tide: conditions.tide,
        hazard: conditions.hazard,
    })
}

pub fn print_prediction(outcome: &PredictOutcome) {
    println!("Beach:   {}", outcome.beach);
    println!(
        "Conditions: weather {} | crowd {}{} | tide {} | hazard {}",
        outcome.weather,
        outcome.crowd,
        if outcome.crowd_estimated { " (estimated)" } else { "" },
        outcome.tide,
        outcome.hazard
    );
    println!("Safety:  {} - {}", outcome.safety, outcome.advisory);
    if let Some(confidence) = outcome.confidence {
        println!("Confidence: {:.0}%", confidence * 100.0);
    }
    if outcome.fallback {
        println!("(model unavailable for these inputs; showing the conservative estimate)");
    }
}

/// Survey every known beach under the configured conditions
pub async fn map(
    config: &AppConfig,
    predictor: &SafetyPredictor,
    weather: Option<String>,
    tide: Option<String>,
) -> Vec<BeachStatus> {
    let mut source = config.conditions.clone();
    if let Some(weather) = weather {
        source.weather = weather;
    }
    if let Some(tide) = tide {
        source.tide = tide;
    }

    survey_beaches(predictor, &source, config.classifier.default_crowd).await
}

pub fn print_map(statuses: &[BeachStatus]) {
    println!(
        "{:<12} {:>8} {:>8}  {:<8} {:<5} {:<7} {:<7} {}",
        "Beach", "Lat", "Lon", "Weather", "Tide", "Safety", "Marker", "Icon"
    );
    for s in statuses {
        println!(
            "{:<12} {:>8.3} {:>8.3}  {:<8} {:<5} {:<7} {:<7} {}",
            s.beach,
            s.lat,
            s.lon,
            s.weather,
            s.tide,
            s.safety,
            s.color(),
            s.icon()
        );
    }
}

pub fn print_crowd(estimate: &CrowdEstimate) {
    println!(
        "Estimated crowd at {}: {} (score {:.2})",
        estimate.beach, estimate.level, estimate.score
    );
    println!();
    print!("{estimate}");
}

/// Daily label counts from the history log
pub fn trends(
    config: &AppConfig,
    today: NaiveDate,
    days: Option<u32>,
) -> anyhow::Result<Vec<DailyTrend>> {
    let log = PredictionLog::from_config(&config.history);
    let records = log.read_all()?;
    let window = days.unwrap_or(config.history.window_days);
    info!(records = records.len(), window, "Summarizing prediction history");
    Ok(summarize_trends(&records, today, window))
}

pub fn print_trends(trends: &[DailyTrend]) {
    if trends.is_empty() {
        println!("No predictions recorded in this window");
        return;
    }

    println!("{:<10}  {:>5} {:>6} {:>4}", "Date", "Green", "Yellow", "Red");
    for day in trends {
        println!(
            "{:<10}  {:>5} {:>6} {:>4}",
            day.date.format("%Y-%m-%d").to_string(),
            day.green,
            day.yellow,
            day.red
        );
    }
}

pub fn print_vocab(predictor: &SafetyPredictor) {
    for column in Column::ALL {
        let vocabulary = predictor
            .encoders()
            .vocabulary(column)
            .map(|v| v.join(", "))
            .unwrap_or_default();
        println!("{:<12} {}", column.name(), vocabulary);
    }
    println!();
    println!("Unseen values are encoded as \"None\".");
}

/// Current local time
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beachsafe_classifiers::ArtifactConfig;
    use beachsafe_telemetry::HistoryConfig;
    use chrono::NaiveDate;

    const DATASET: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../data/goa_beach_safety_dataset.csv"
    );

    fn config_in(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.classifier.artifacts = ArtifactConfig::in_dir(dir.join("model"));
        config.classifier.training.n_estimators = 20;
        config.history = HistoryConfig {
            path: dir.join("logs").join("safety_log.csv"),
            window_days: 7,
        };
        config
    }

    fn noon(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_predict_without_artifacts_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_predictor(&config_in(dir.path())).unwrap_err();
        assert!(err.to_string().contains("beachsafe train"));
    }

    #[test]
    fn test_train_predict_and_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let report = train(&config, Some(PathBuf::from(DATASET)), None, None).unwrap();
        assert_eq!(report.artifacts.model.forest.n_estimators(), 20);
        assert!(config.artifacts().model_path.exists());

        let predictor = load_predictor(&config).unwrap();
        let outcome = predict(
            &config,
            &predictor,
            PredictRequest {
                beach: "Baga".into(),
                weather: "Sunny".into(),
                crowd: Some("High".into()),
                tide: "High".into(),
                hazard: "Glass".into(),
                at: noon(13),
                log: true,
            },
        )
        .unwrap();
        assert_eq!(outcome.safety, SafetyLabel::Red);
        assert!(!outcome.crowd_estimated);

        let trends = trends(&config, NaiveDate::from_ymd_opt(2025, 12, 14).unwrap(), None).unwrap();
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].red, 1);
    }

    #[test]
    fn test_predict_estimates_missing_crowd() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        train(&config, Some(PathBuf::from(DATASET)), Some(10), None).unwrap();
        let predictor = load_predictor(&config).unwrap();

        // Saturday afternoon in peak season
        let outcome = predict(
            &config,
            &predictor,
            PredictRequest {
                beach: "Baga".into(),
                weather: "Sunny".into(),
                crowd: None,
                tide: "Low".into(),
                hazard: "None".into(),
                at: noon(13),
                log: false,
            },
        )
        .unwrap();
        assert!(outcome.crowd_estimated);
        assert_eq!(outcome.crowd, "High");
        assert!(!config.history.path.exists());
    }

    #[tokio::test]
    async fn test_map_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        train(&config, Some(PathBuf::from(DATASET)), Some(10), None).unwrap();
        let predictor = load_predictor(&config).unwrap();

        let statuses = map(
            &config,
            &predictor,
            Some("Thunderstorm".into()),
            Some("High".into()),
        )
        .await;
        assert_eq!(statuses.len(), 18);
        assert!(statuses.iter().all(|s| s.weather == "Stormy" && s.tide == "High"));
    }

    #[test]
    fn test_trends_accepts_any_window() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let today = NaiveDate::from_ymd_opt(2025, 12, 14).unwrap();

        assert!(trends(&config, today, Some(u32::MAX)).unwrap().is_empty());
    }
}
