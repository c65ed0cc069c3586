use crate::error::{EscError, EscResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    /// Warn once the stack holds more than this many live handlers
    /// (None = never warn)
    pub leak_warn_threshold: Option<usize>,

    /// Emit a debug event for every handler invocation during a drain
    pub log_invocations: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            leak_warn_threshold: Some(32), // deeper than any sane layer nesting
            log_invocations: true,
        }
    }
}

impl StackConfig {
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> EscResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EscError::config_io(path.as_ref(), &e))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| EscError::ConfigParse(e.to_string().into()))?;

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> EscResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EscError::ConfigSerialize(e.to_string().into()))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| EscError::config_io(path.as_ref(), &e))?;

        Ok(())
    }
}
