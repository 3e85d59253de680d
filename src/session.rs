//! Per-session state: running cost, observed latencies, the image gallery and
//! the prompt currently shown in the input box.
//!
//! A `SessionState` lives exactly as long as the UI session that owns it and is
//! never persisted.

use crate::config::DEFAULT_COST_PER_IMAGE;
use crate::models::{format_currency, format_latency, MetricsSnapshot};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Generating,
    Displaying,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    total_cost: f64,
    latencies: Vec<f64>,
    gallery: Vec<String>,
    selected_prompt: String,
    cost_per_image: f64,
    phase: Phase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_COST_PER_IMAGE)
    }
}

impl SessionState {
    pub fn new(cost_per_image: f64) -> Self {
        Self {
            total_cost: 0.0,
            latencies: Vec::new(),
            gallery: Vec::new(),
            selected_prompt: String::new(),
            cost_per_image,
            phase: Phase::Idle,
        }
    }

    /// Records one successful generation.
    pub fn append_result(&mut self, image: String, latency_seconds: f64) {
        self.gallery.push(image);
        self.latencies.push(latency_seconds);
        self.total_cost += self.cost_per_image;
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.selected_prompt = text.into();
        self.phase = Phase::Idle;
    }

    pub fn selected_prompt(&self) -> &str {
        &self.selected_prompt
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn cost_per_image(&self) -> f64 {
        self.cost_per_image
    }

    pub fn latencies(&self) -> &[f64] {
        &self.latencies
    }

    /// Oldest first, in insertion order.
    pub fn gallery(&self) -> &[String] {
        &self.gallery
    }

    pub fn gallery_newest_first(&self) -> impl Iterator<Item = &String> {
        self.gallery.iter().rev()
    }

    /// Mean of all recorded latencies, `None` before the first image.
    pub fn average_latency(&self) -> Option<f64> {
        if self.latencies.is_empty() {
            return None;
        }
        Some(self.latencies.iter().sum::<f64>() / self.latencies.len() as f64)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cost_per_image: format_currency(self.cost_per_image),
            total_cost: format_currency(self.total_cost),
            average_latency: format_latency(self.average_latency()),
            images_generated: self.gallery.len(),
        }
    }
}
