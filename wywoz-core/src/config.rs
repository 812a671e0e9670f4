//! Tunable thresholds of the pipeline, loaded from the environment.

use std::env::{self, VarError};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::model::DateRange;
use crate::vocabulary::Locale;

/// Longest window reach, in days, accepted from the environment.
pub const MAX_WINDOW_DAYS: i64 = 3660;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while reading configuration.
pub enum ConfigError {
    /// A variable was set to a value that cannot be used.
    #[error("Invalid value for {var}: {reason}")]
    InvalidEnvVar {
        /// Name of the offending variable.
        var: String,
        /// Why the value was rejected.
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Thresholds and defaults shared by resolution and extraction.
pub struct PipelineConfig {
    /// Minimum street similarity score in `[0, 1]` for a match to be accepted.
    pub street_threshold: f64,
    /// Recognized regions below this confidence are discarded.
    pub min_confidence: f32,
    /// How far below a row, relative to its own height, a region may start and still join it.
    pub row_tolerance: f32,
    /// Days before today that the expected schedule window reaches back.
    pub window_lookback_days: i64,
    /// Days after today that the expected schedule window reaches forward.
    pub window_horizon_days: i64,
    /// Language of the schedule image.
    pub locale: Locale,
    /// Default tracing filter used by binaries.
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            street_threshold: 0.8,
            min_confidence: 0.3,
            row_tolerance: 0.5,
            window_lookback_days: 0,
            window_horizon_days: 90,
            locale: Locale::Polish,
            log_level: "info".to_owned(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from `WYWOZ_*` environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] when a variable is set but unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let defaults = Self::default();

        let street_threshold = parse_or(
            &lookup,
            "WYWOZ_STREET_THRESHOLD",
            defaults.street_threshold,
        )?;
        ensure_unit(
            "WYWOZ_STREET_THRESHOLD",
            (0.0..=1.0).contains(&street_threshold),
        )?;

        let min_confidence = parse_or(&lookup, "WYWOZ_MIN_CONFIDENCE", defaults.min_confidence)?;
        ensure_unit(
            "WYWOZ_MIN_CONFIDENCE",
            (0.0..=1.0).contains(&min_confidence),
        )?;

        let row_tolerance = parse_or(&lookup, "WYWOZ_ROW_TOLERANCE", defaults.row_tolerance)?;
        if !row_tolerance.is_finite() || row_tolerance < 0.0 {
            return Err(invalid("WYWOZ_ROW_TOLERANCE", "must be a non-negative number"));
        }

        let window_lookback_days = parse_or(
            &lookup,
            "WYWOZ_WINDOW_LOOKBACK_DAYS",
            defaults.window_lookback_days,
        )?;
        let window_horizon_days = parse_or(
            &lookup,
            "WYWOZ_WINDOW_HORIZON_DAYS",
            defaults.window_horizon_days,
        )?;
        for (var, days) in [
            ("WYWOZ_WINDOW_LOOKBACK_DAYS", window_lookback_days),
            ("WYWOZ_WINDOW_HORIZON_DAYS", window_horizon_days),
        ] {
            if !(0..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(invalid(
                    var,
                    &format!("must be between 0 and {MAX_WINDOW_DAYS} days"),
                ));
            }
        }

        let locale = match lookup("WYWOZ_LOCALE") {
            Ok(raw) => raw
                .parse::<Locale>()
                .map_err(|reason| invalid("WYWOZ_LOCALE", &reason))?,
            Err(_) => defaults.locale,
        };

        let log_level = lookup("WYWOZ_LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            street_threshold,
            min_confidence,
            row_tolerance,
            window_lookback_days,
            window_horizon_days,
            locale,
            log_level,
        })
    }

    /// Expected schedule window around `today`.
    #[must_use]
    pub fn window(&self, today: NaiveDate) -> DateRange {
        DateRange::around(today, self.window_lookback_days, self.window_horizon_days)
    }
}

fn parse_or<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| invalid(var, &err.to_string())),
        Err(_) => Ok(default),
    }
}

fn ensure_unit(var: &str, in_range: bool) -> Result<(), ConfigError> {
    if in_range {
        Ok(())
    } else {
        Err(invalid(var, "must be between 0 and 1"))
    }
}

fn invalid(var: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_owned(),
        reason: reason.to_owned(),
    }
}
