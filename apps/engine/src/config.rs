use anyhow::{Context, Result};

/// Engine configuration loaded from environment variables.
/// Every variable has a default, so `from_env` only fails on unparseable values.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Retention window for idempotency keys, in hours.
    pub idempotency_retention_hours: i64,
    /// Baseline grid size for vertical snapping, in inches.
    pub baseline_grid_in: f64,
    /// Theme name stamped into generated LSP metadata.
    pub theme: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            idempotency_retention_hours: 24,
            baseline_grid_in: 0.25,
            theme: "corporate_blue".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = EngineConfig::default();

        Ok(EngineConfig {
            idempotency_retention_hours: optional_env(
                "IDEMPOTENCY_RETENTION_HOURS",
                defaults.idempotency_retention_hours,
            )?,
            baseline_grid_in: optional_env("BASELINE_GRID_IN", defaults.baseline_grid_in)?,
            theme: std::env::var("LAYOUT_THEME").unwrap_or(defaults.theme),
        })
    }
}

fn optional_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.idempotency_retention_hours, 24);
        assert!((config.baseline_grid_in - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.theme, "corporate_blue");
    }
}
