//! Candidate spellings for class lookups
//!
//! Class names arrive in several shapes: a canonical package path
//! (`/Script/Engine.Actor`), a module-qualified short form (`Engine.Actor`),
//! a blueprint asset path without its generated-class suffix
//! (`/Game/Blueprints/BP_Door`), or a plain registered name. The registry is
//! only ever asked about exact names; this module expands the caller's text into
//! the ordered list of names worth asking about.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{GAME_PACKAGE_PREFIX, GENERATED_CLASS_SUFFIX, SCRIPT_PACKAGE_PREFIX};

/// `Module.Class`, a native class without its `/Script/` root
static MODULE_QUALIFIED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\w+\.\w+$").ok());

/// Ordered lookup candidates for a class name
#[must_use]
pub fn class_candidates(name: &str) -> Vec<String> {
    let name = name.trim();
    let mut candidates = vec![name.to_string()];

    if MODULE_QUALIFIED
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name))
    {
        candidates.push(format!("{SCRIPT_PACKAGE_PREFIX}{name}"));
    } else if name.starts_with(GAME_PACKAGE_PREFIX)
        && !name.ends_with(GENERATED_CLASS_SUFFIX)
        && let Some((_, asset)) = name.rsplit_once('/')
        && !asset.is_empty()
        && !asset.contains('.')
    {
        candidates.push(format!("{name}.{asset}{GENERATED_CLASS_SUFFIX}"));
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_is_its_own_candidate() {
        assert_eq!(class_candidates("Actor"), vec!["Actor"]);
    }

    #[test]
    fn test_module_qualified_name_gains_script_root() {
        assert_eq!(
            class_candidates("Engine.Actor"),
            vec!["Engine.Actor", "/Script/Engine.Actor"]
        );
    }

    #[test]
    fn test_blueprint_asset_path_gains_generated_class() {
        assert_eq!(
            class_candidates("/Game/Blueprints/BP_Door"),
            vec!["/Game/Blueprints/BP_Door", "/Game/Blueprints/BP_Door.BP_Door_C"]
        );
    }

    #[test]
    fn test_canonical_paths_are_left_alone() {
        assert_eq!(
            class_candidates("/Game/Blueprints/BP_Door.BP_Door_C"),
            vec!["/Game/Blueprints/BP_Door.BP_Door_C"]
        );
        assert_eq!(
            class_candidates("/Script/Engine.Actor"),
            vec!["/Script/Engine.Actor"]
        );
    }
}
