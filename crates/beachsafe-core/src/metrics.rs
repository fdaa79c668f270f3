//! Metric names shared by the emitting crates and the recorder setup

/// Predictions served, labelled by safety label
pub const PREDICTIONS_TOTAL: &str = "beachsafe_predictions_total";

/// Predictions answered by the conservative fallback
pub const PREDICTION_FALLBACKS_TOTAL: &str = "beachsafe_prediction_fallbacks_total";

/// Inputs outside a column's trained vocabulary, labelled by column
pub const UNKNOWN_CATEGORIES_TOTAL: &str = "beachsafe_unknown_categories_total";

/// End-to-end prediction latency
pub const PREDICTION_LATENCY_US: &str = "beachsafe_prediction_latency_us";

/// Every metric name, for registration and checks
pub const ALL: [&str; 4] = [
    PREDICTIONS_TOTAL,
    PREDICTION_FALLBACKS_TOTAL,
    UNKNOWN_CATEGORIES_TOTAL,
    PREDICTION_LATENCY_US,
];
