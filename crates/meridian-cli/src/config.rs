//! Runtime configuration for the `meridian` CLI.

use meridian_proj::{MAX_DIMENSION, MIN_DIMENSION};

/// Default tuple size when neither the environment nor a flag sets one.
const DEFAULT_DIMENSION: usize = 2;
/// Default number of decimals printed per component.
const DEFAULT_PRECISION: usize = 6;
/// Upper bound on printed decimals.
const MAX_PRECISION: usize = 17;

/// Settings shared by the transform commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Components per coordinate tuple.
    pub dimension: usize,
    /// Decimals printed per component.
    pub precision: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl CliConfig {
    /// Build from `MERIDIAN_DIMENSION` / `MERIDIAN_PRECISION` as returned by
    /// `lookup`, ignoring values that don't parse or are out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dimension = lookup("MERIDIAN_DIMENSION")
            .and_then(|s| s.trim().parse().ok())
            .filter(|d| (MIN_DIMENSION..=MAX_DIMENSION).contains(d))
            .unwrap_or(DEFAULT_DIMENSION);
        let precision = lookup("MERIDIAN_PRECISION")
            .and_then(|s| s.trim().parse().ok())
            .filter(|p| *p <= MAX_PRECISION)
            .unwrap_or(DEFAULT_PRECISION);
        Self {
            dimension,
            precision,
        }
    }

    /// Apply command-line flags on top of the environment defaults.
    pub fn with_overrides(mut self, dimension: Option<usize>, precision: Option<usize>) -> Self {
        if let Some(dimension) = dimension {
            self.dimension = dimension;
        }
        if let Some(precision) = precision {
            self.precision = precision.min(MAX_PRECISION);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = CliConfig::from_lookup(|_| None);
        assert_eq!(cfg.dimension, 2);
        assert_eq!(cfg.precision, 6);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = CliConfig::from_lookup(lookup(&[
            ("MERIDIAN_DIMENSION", "3"),
            ("MERIDIAN_PRECISION", " 9 "),
        ]));
        assert_eq!(cfg.dimension, 3);
        assert_eq!(cfg.precision, 9);
    }

    #[test]
    fn invalid_environment_values_fall_back() {
        let cfg = CliConfig::from_lookup(lookup(&[
            ("MERIDIAN_DIMENSION", "1"),
            ("MERIDIAN_PRECISION", "lots"),
        ]));
        assert_eq!(cfg, CliConfig::from_lookup(|_| None));
    }

    #[test]
    fn flags_win_over_environment() {
        let cfg = CliConfig::from_lookup(lookup(&[("MERIDIAN_DIMENSION", "3")]))
            .with_overrides(Some(4), Some(40));
        assert_eq!(cfg.dimension, 4);
        assert_eq!(cfg.precision, MAX_PRECISION);
    }
}
