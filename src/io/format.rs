//! Save format configuration

/// Supported model serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// JSON (serde_json)
    Json,
    /// YAML (serde_yaml)
    Yaml,
}

/// Configuration for saving a model
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// Output format
    pub format: ModelFormat,
    /// Pretty-print (JSON only)
    pub pretty: bool,
}

impl SaveConfig {
    /// Create a save config for the given format
    pub fn new(format: ModelFormat) -> Self {
        Self {
            format,
            pretty: true,
        }
    }

    /// Enable or disable pretty printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self::new(ModelFormat::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_config_default() {
        let config = SaveConfig::default();
        assert_eq!(config.format, ModelFormat::Json);
        assert!(config.pretty);
    }

    #[test]
    fn test_save_config_builder() {
        let config = SaveConfig::new(ModelFormat::Yaml).with_pretty(false);
        assert_eq!(config.format, ModelFormat::Yaml);
        assert!(!config.pretty);
    }
}
