//! Shared constants for the resolver, serializer and mutator

// ============================================================================
// SIGNATURE GRAMMAR CONSTANTS
// ============================================================================

/// Keyword opening an array signature (`Array<T>`)
pub const KEYWORD_ARRAY: &str = "Array";

/// Keyword opening a set signature (`Set<T>`)
pub const KEYWORD_SET: &str = "Set";

/// Keyword opening a map signature (`Map<K,V>`)
pub const KEYWORD_MAP: &str = "Map";

/// Suffix marking an object reference (`AActor*`)
pub const POINTER_SUFFIX: char = '*';

/// Maximum generic nesting accepted by the signature parser
pub const MAX_SIGNATURE_DEPTH: usize = 32;

// ============================================================================
// CLASS PATH CONSTANTS
// ============================================================================

/// Package root for native classes
pub const SCRIPT_PACKAGE_PREFIX: &str = "/Script/";

/// Package root for content assets
pub const GAME_PACKAGE_PREFIX: &str = "/Game/";

/// Suffix of generated blueprint classes
pub const GENERATED_CLASS_SUFFIX: &str = "_C";

// ============================================================================
// PATH AND LITERAL CONSTANTS
// ============================================================================

/// Separator between property path segments
pub const PATH_SEPARATOR: char = '.';

/// Separator between `key=value` pairs of a struct literal
pub const LITERAL_PAIR_SEPARATOR: char = ',';

/// Separator between key and value inside a struct literal pair
pub const LITERAL_KEY_SEPARATOR: char = '=';

/// Highest array or set index a path may address; larger indices are rejected
/// instead of growing the container
pub const MAX_AUTO_GROW_INDEX: usize = 65_535;

/// Raw value that clears an object reference
pub const NULL_OBJECT_LITERAL: &str = "None";

// ============================================================================
// MAP ENCODING CONSTANTS
// ============================================================================

/// Field holding the key of an encoded map entry
pub const MAP_ENTRY_KEY: &str = "key";

/// Field holding the value of an encoded map entry
pub const MAP_ENTRY_VALUE: &str = "value";
