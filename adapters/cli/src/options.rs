//! Optional TOML overrides layered on top of a named preset.
//!
//! Every field is optional; absent fields leave the preset untouched.
//! Durations are expressed in whole milliseconds to keep the file
//! hand-editable.

use std::time::Duration;

use life_matrix_core::ShowConfig;
use serde::Deserialize;

/// Overrides parsed from an options file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ShowOptions {
    /// Probability a cell starts alive when the grid is reseeded.
    pub initial_density: Option<f64>,
    /// Generations of unchanged population before a cruise reseed.
    pub stale_reset_generations: Option<u32>,
    /// Number of stars sampled for the night sky.
    pub star_count: Option<usize>,
    /// Replacement ticker script.
    pub ticker_lines: Option<Vec<String>>,
    /// Per-pixel scroll delay for the fastest line, in milliseconds.
    pub scroll_base_delay_ms: Option<u64>,
    /// Star-lit pause between ticker lines, in milliseconds.
    pub line_pause_ms: Option<u64>,
    /// Length of the opening star-only phase, in milliseconds.
    pub stargaze_ms: Option<u64>,
    /// Total wall time of the dawn transition, in milliseconds.
    pub dawn_hold_ms: Option<u64>,
    /// Whether the tempo walk stands still during the dissolve.
    pub freeze_tempo_during_dissolve: Option<bool>,
}

impl ShowOptions {
    /// Applies every present override to the configuration.
    pub(crate) fn apply(&self, config: &mut ShowConfig) {
        if let Some(density) = self.initial_density {
            config.initial_density = density;
        }
        if let Some(generations) = self.stale_reset_generations {
            config.stale_reset_generations = generations;
        }
        if let Some(count) = self.star_count {
            config.star_count = count;
        }
        if let Some(lines) = &self.ticker_lines {
            config.ticker_lines = lines.clone();
        }
        if let Some(millis) = self.scroll_base_delay_ms {
            config.scroll_base_delay = Duration::from_millis(millis);
        }
        if let Some(millis) = self.line_pause_ms {
            config.line_pause = Duration::from_millis(millis);
        }
        if let Some(millis) = self.stargaze_ms {
            config.stargaze = Duration::from_millis(millis);
        }
        if let Some(millis) = self.dawn_hold_ms {
            config.dawn_hold = Duration::from_millis(millis);
        }
        if let Some(freeze) = self.freeze_tempo_during_dissolve {
            config.freeze_tempo_during_dissolve = freeze;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_leave_the_preset_untouched() {
        let options: ShowOptions = toml::from_str("").expect("empty file parses");
        let mut config = ShowConfig::preview(7);
        let before = config.clone();
        options.apply(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn present_fields_override_the_preset() {
        let options: ShowOptions = toml::from_str(
            r#"
            initial_density = 0.35
            stargaze_ms = 1000
            ticker_lines = ["only line"]
            "#,
        )
        .expect("valid overrides parse");

        let mut config = ShowConfig::preview(7);
        options.apply(&mut config);
        assert_eq!(config.initial_density, 0.35);
        assert_eq!(config.stargaze, Duration::from_millis(1_000));
        assert_eq!(config.ticker_lines, vec!["only line".to_string()]);
        // Untouched fields keep their preset values.
        assert_eq!(config.stale_reset_generations, 50);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ShowOptions, _> = toml::from_str("tickr_lines = []");
        assert!(result.is_err());
    }
}
