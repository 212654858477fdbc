/// Shared font scale: one value for every pane, moved in fixed steps.

use crate::config::FontConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct FontScale {
    value: f64,
    default: f64,
    step: f64,
    min: f64,
}

impl FontScale {
    pub fn new(config: &FontConfig) -> Self {
        Self {
            value: config.default_scale,
            default: config.default_scale,
            step: config.step,
            min: config.min_scale,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.value = snap(self.value + self.step);
        self.value
    }

    /// Never goes below the configured minimum.
    pub fn zoom_out(&mut self) -> f64 {
        self.value = snap(self.value - self.step).max(self.min);
        self.value
    }

    pub fn reset(&mut self) -> f64 {
        self.value = self.default;
        self.value
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self::new(&FontConfig::default())
    }
}

/// Round to one decimal so repeated steps don't drift off the 0.1 grid.
fn snap(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
