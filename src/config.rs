use serde::{Deserialize, Serialize};

use crate::types::GridShape;

/// Smallest pallet growth step accepted from callers.
pub const MIN_SCALE_STEP: f64 = 0.01;
/// Largest scale factor accepted from callers.
pub const MAX_SCALE_LIMIT: f64 = 5.0;

/// Search parameters threaded through every stage of the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Preferred rows:columns ratio for candidate shapes.
    pub target_ratio: f64,
    /// Largest grid the flexible placement search will try.
    pub flexible_bound: GridShape,
    /// Pallet growth per scaling step, as a fraction of the base size.
    pub scale_step: f64,
    /// Largest scale factor tried before giving up.
    pub max_scale: f64,
    /// Upper bound accepted for any box or pallet side.
    pub max_dimension: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target_ratio: 6.0 / 5.0,
            flexible_bound: GridShape::new(8, 8),
            scale_step: 0.1,
            max_scale: 3.0,
            max_dimension: 1000.0,
        }
    }
}

impl SearchConfig {
    /// Scale factors to try in order, starting at 1.0.
    pub fn scale_factors(&self) -> impl Iterator<Item = f64> {
        let step = self.scale_step;
        let steps = if step > 0.0 && self.max_scale >= 1.0 {
            ((self.max_scale - 1.0) / step + 1e-9).floor() as usize
        } else {
            0
        };
        (0..=steps).map(move |i| 1.0 + i as f64 * step)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.target_ratio.is_finite() && self.target_ratio > 0.0) {
            return Err(format!("target ratio must be positive, got {}", self.target_ratio));
        }
        if self.flexible_bound.rows == 0 || self.flexible_bound.columns == 0 {
            return Err("flexible grid bound must be non-zero".to_string());
        }
        if !(self.scale_step.is_finite() && self.scale_step >= MIN_SCALE_STEP) {
            return Err(format!(
                "scale step must be at least {}, got {}",
                MIN_SCALE_STEP, self.scale_step
            ));
        }
        if !(self.max_scale >= 1.0 && self.max_scale <= MAX_SCALE_LIMIT) {
            return Err(format!(
                "max scale must be between 1 and {}, got {}",
                MAX_SCALE_LIMIT, self.max_scale
            ));
        }
        if !(self.max_dimension.is_finite() && self.max_dimension > 0.0) {
            return Err("max dimension must be positive".to_string());
        }
        Ok(())
    }
}

/// Checks both sides are positive and at most `max`.
pub fn validate_dimensions(width: f64, length: f64, max: f64) -> Result<(), String> {
    for (name, value) in [("width", width), ("length", length)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("{} must be positive, got {}", name, value));
        }
        if value > max {
            return Err(format!("{} {} exceeds the maximum of {}", name, value, max));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_factors() {
        let factors: Vec<f64> = SearchConfig::default().scale_factors().collect();
        assert_eq!(factors.len(), 21);
        assert_eq!(factors[0], 1.0);
        assert!((factors[1] - 1.1).abs() < 1e-12);
        assert!((factors[20] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_step_tries_base_only() {
        let config = SearchConfig {
            scale_step: 0.0,
            ..SearchConfig::default()
        };
        assert_eq!(config.scale_factors().collect::<Vec<_>>(), vec![1.0]);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"target_ratio": 1.5}"#).unwrap();
        assert_eq!(config.target_ratio, 1.5);
        assert_eq!(config.flexible_bound, GridShape::new(8, 8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let config = SearchConfig {
            target_ratio: 0.0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SearchConfig {
            flexible_bound: GridShape::new(0, 4),
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_scaling_work() {
        let tiny_step = SearchConfig {
            scale_step: 1e-12,
            ..SearchConfig::default()
        };
        assert!(tiny_step.validate().is_err());

        let huge_scale = SearchConfig {
            max_scale: 1e9,
            ..SearchConfig::default()
        };
        assert!(huge_scale.validate().is_err());

        let below_one = SearchConfig {
            max_scale: 0.5,
            ..SearchConfig::default()
        };
        assert!(below_one.validate().is_err());

        // The widest accepted range still yields a few hundred factors.
        let widest = SearchConfig {
            scale_step: MIN_SCALE_STEP,
            max_scale: MAX_SCALE_LIMIT,
            ..SearchConfig::default()
        };
        assert!(widest.validate().is_ok());
        assert_eq!(widest.scale_factors().count(), 401);
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(validate_dimensions(8.0, 10.0, 1000.0).is_ok());
        assert!(validate_dimensions(0.0, 10.0, 1000.0).is_err());
        assert!(validate_dimensions(8.0, -1.0, 1000.0).is_err());
        assert!(validate_dimensions(8.0, 1200.0, 1000.0).is_err());
        assert!(validate_dimensions(f64::NAN, 10.0, 1000.0).is_err());
    }
}
