//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

fn check_unit_range(value: f32, field: &str) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be between 0.0 and 1.0"
        )));
    }
    Ok(())
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_unit_range(self.thresholds.general, "thresholds.general")?;
        check_unit_range(self.thresholds.character, "thresholds.character")?;
        check_unit_range(self.thresholds.rating, "thresholds.rating")?;
        check_unit_range(
            self.thresholds.character_mcut_floor,
            "thresholds.character_mcut_floor",
        )?;
        check_unit_range(
            self.thresholds.general_mcut_floor,
            "thresholds.general_mcut_floor",
        )?;
        check_unit_range(
            self.thresholds.min_categorical_confidence,
            "thresholds.min_categorical_confidence",
        )?;

        if self.model.default_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.default_model must not be empty".into(),
            ));
        }
        if self.model.fallback_input_size == 0 {
            return Err(ConfigError::ValidationError(
                "model.fallback_input_size must be > 0".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.thresholds.general = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("thresholds.general"));

        config.thresholds.general = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_floor() {
        let mut config = Config::default();
        config.thresholds.character_mcut_floor = 2.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("character_mcut_floor"));
    }

    #[test]
    fn test_validate_rejects_empty_model_id() {
        let mut config = Config::default();
        config.model.default_model = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_model"));
    }

    #[test]
    fn test_validate_rejects_zero_input_size() {
        let mut config = Config::default();
        config.model.fallback_input_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fallback_input_size"));
    }
}
