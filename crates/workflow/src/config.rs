use std::time::Duration;

use sheetflow_client::config::env_or;
use sheetflow_client::ConfigError;
use validator::Validate;

/// Tunables for the workflow controller.
#[derive(Debug, Clone, Validate)]
pub struct WorkflowConfig {
    /// Percentage added per synthetic progress tick (default: `5`).
    #[validate(range(min = 1, max = 99))]
    pub insert_progress_step: u8,
    /// Time between synthetic progress ticks in milliseconds (default: `100`).
    #[validate(range(min = 1))]
    pub insert_progress_interval_ms: u64,
    /// Synthetic progress never passes this value (default: `95`).
    #[validate(range(min = 1, max = 99))]
    pub insert_progress_cap: u8,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            insert_progress_step: 5,
            insert_progress_interval_ms: 100,
            insert_progress_cap: 95,
        }
    }
}

impl WorkflowConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                                  | Default |
    /// |------------------------------------------|---------|
    /// | `SHEETFLOW_INSERT_PROGRESS_STEP`         | `5`     |
    /// | `SHEETFLOW_INSERT_PROGRESS_INTERVAL_MS`  | `100`   |
    /// | `SHEETFLOW_INSERT_PROGRESS_CAP`          | `95`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            insert_progress_step: env_or(
                "SHEETFLOW_INSERT_PROGRESS_STEP",
                defaults.insert_progress_step,
            )?,
            insert_progress_interval_ms: env_or(
                "SHEETFLOW_INSERT_PROGRESS_INTERVAL_MS",
                defaults.insert_progress_interval_ms,
            )?,
            insert_progress_cap: env_or(
                "SHEETFLOW_INSERT_PROGRESS_CAP",
                defaults.insert_progress_cap,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn insert_progress_interval(&self) -> Duration {
        Duration::from_millis(self.insert_progress_interval_ms)
    }
}
