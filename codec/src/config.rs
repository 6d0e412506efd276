//! Codec configuration
//!
//! The only tunable is the allow-list of classes whose objects are encoded inline
//! ("detail classes"). References to any other class encode as the referenced
//! object's identity string.

use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::reflection::ObjectModel;
use crate::type_descriptor::ClassId;

/// Serializer settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Classes (and their subclasses) whose referenced objects are encoded field by field
    pub detail_classes: Vec<ClassId>,
}

impl CodecConfig {
    /// Config with the given allow-list
    #[must_use]
    pub fn with_detail_classes<I, C>(classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ClassId>,
    {
        Self {
            detail_classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a JSON config document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Report::new(ConfigError::Parse(e.to_string())))?;
        debug!(detail_classes = config.detail_classes.len(), "Loaded codec config");
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Report::new(ConfigError::Io(e.to_string())))
            .attach_with(|| format!("Path: {}", path.display()))?;
        Self::from_json_str(&json).attach_with(|| format!("Path: {}", path.display()))
    }

    /// Whether objects of `class` are encoded inline
    #[must_use]
    pub fn is_detail_class<H: ObjectModel + ?Sized>(&self, host: &H, class: &ClassId) -> bool {
        self.detail_classes
            .iter()
            .any(|allowed| host.is_child_of(class, allowed))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::memory::fixture::{ACTOR_CLASS, DOOR_CLASS, class, door_model};

    #[test]
    fn test_default_allow_list_is_empty() {
        let config = CodecConfig::from_json_str("{}").unwrap();
        assert!(config.detail_classes.is_empty());
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let error = CodecConfig::from_json_str(r#"{ "detail": [] }"#).unwrap_err();
        assert!(matches!(error.current_context(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_allow_list_admits_subclasses() {
        let model = door_model();
        let config = CodecConfig::with_detail_classes([ACTOR_CLASS]);
        assert!(config.is_detail_class(&model, &class(DOOR_CLASS)));

        let config = CodecConfig::with_detail_classes([DOOR_CLASS]);
        assert!(!config.is_detail_class(&model, &class(ACTOR_CLASS)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.json");
        std::fs::write(&path, r#"{ "detail_classes": ["/Script/Game.Door"] }"#).unwrap();
        let config = CodecConfig::from_file(&path).unwrap();
        assert_eq!(config.detail_classes, vec![ClassId::from(DOOR_CLASS)]);

        let error = CodecConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(error.current_context(), ConfigError::Io(_)));
    }
}
