use serde::{Deserialize, Serialize};

use crate::query::types::Fuzziness;
use crate::schema::DynamicMapping;

/// Query compiler configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Field searched by query strings that do not name one
    pub default_field: String,
    /// Build leaves in filter context (no scoring)
    pub filter_context: bool,
    pub default_fuzziness: Fuzziness,
    pub default_max_expansions: usize,
    /// Rewrite method for multi-term leaves without an explicit one
    pub default_rewrite: Option<String>,
    /// Time zone rendered on date ranges
    pub date_time_zone: Option<String>,
    /// Overrides the schema's behavior for unmapped fields
    pub dynamic: Option<DynamicMapping>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_field: "content".to_string(),
            filter_context: false,
            default_fuzziness: Fuzziness::default(),
            default_max_expansions: 50,
            default_rewrite: None,
            date_time_zone: None,
            dynamic: None,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = field.into();
        self
    }

    pub fn with_filter_context(mut self, filter_context: bool) -> Self {
        self.filter_context = filter_context;
        self
    }

    pub fn with_default_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.default_fuzziness = fuzziness;
        self
    }

    pub fn with_default_max_expansions(mut self, max_expansions: usize) -> Self {
        self.default_max_expansions = max_expansions;
        self
    }

    pub fn with_default_rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.default_rewrite = Some(rewrite.into());
        self
    }

    pub fn with_date_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.date_time_zone = Some(time_zone.into());
        self
    }

    pub fn with_dynamic(mut self, dynamic: DynamicMapping) -> Self {
        self.dynamic = Some(dynamic);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.default_field, "content");
        assert!(!config.filter_context);
        assert_eq!(config.default_fuzziness, Fuzziness::Auto { low: 3, high: 6 });
        assert_eq!(config.default_max_expansions, 50);
        assert!(config.dynamic.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = CompilerConfig::new()
            .with_default_field("body")
            .with_filter_context(true)
            .with_date_time_zone("Europe/Paris")
            .with_dynamic(DynamicMapping::Strict);

        assert_eq!(config.default_field, "body");
        assert!(config.filter_context);
        assert_eq!(config.date_time_zone.as_deref(), Some("Europe/Paris"));
        assert_eq!(config.dynamic, Some(DynamicMapping::Strict));
    }

    #[test]
    fn test_partial_deserialize() {
        let config: CompilerConfig =
            serde_json::from_str(r#"{"default_field": "body", "dynamic": "strict"}"#).unwrap();
        assert_eq!(config.default_field, "body");
        assert_eq!(config.default_max_expansions, 50);
        assert_eq!(config.dynamic, Some(DynamicMapping::Strict));
    }
}
