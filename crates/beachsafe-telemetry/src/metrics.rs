//! Metric names and descriptions

pub use beachsafe_core::metrics::{
    PREDICTIONS_TOTAL, PREDICTION_FALLBACKS_TOTAL, PREDICTION_LATENCY_US, UNKNOWN_CATEGORIES_TOTAL,
};

/// Register descriptions with the installed recorder
pub fn describe_metrics() {
    metrics::describe_counter!(PREDICTIONS_TOTAL, "Total number of safety predictions by label");
    metrics::describe_counter!(
        PREDICTION_FALLBACKS_TOTAL,
        "Predictions that fell back to the conservative label"
    );
    metrics::describe_counter!(
        UNKNOWN_CATEGORIES_TOTAL,
        "Input values outside the trained vocabulary by column"
    );
    metrics::describe_histogram!(
        PREDICTION_LATENCY_US,
        metrics::Unit::Microseconds,
        "Prediction latency in microseconds"
    );
}
