use serde::{Deserialize, Serialize};

/// Display-ready metrics for one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    pub cost_per_image: String,
    pub total_cost: String,
    pub average_latency: String,
    pub images_generated: usize,
}

pub const LATENCY_PLACEHOLDER: &str = "-";

pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn format_latency(seconds: Option<f64>) -> String {
    match seconds {
        Some(value) => format!("{:.2}", value),
        None => LATENCY_PLACEHOLDER.to_string(),
    }
}
