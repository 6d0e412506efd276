//! Type-name resolver
//!
//! Turns human-readable type signatures (`int32`, `Array<float>`,
//! `Map<string,Array<Vector>>`, `AActor*`) into [`TypeDescriptor`]s.
//!
//! Resolution runs in two phases. [`parse_signature`] checks the grammar and builds
//! a [`TypeSignature`] tree; the [`Resolver`] then looks every name up, first in the
//! scalar keyword table and then in the host's [`TypeRegistry`] as a struct, an enum
//! and finally a class. Any name that fails to resolve fails the whole signature.

mod class_path;
mod signature_parser;

use std::sync::LazyLock;

use error_stack::{Report, ResultExt};
use regex::Regex;
pub use signature_parser::{TypeSignature, parse_signature, split_top_level};
use tracing::{debug, warn};

pub use self::class_path::class_candidates;
use crate::error::{TypeError, TypeResult};
use crate::type_descriptor::{ClassId, EnumId, ScalarKeyword, StructId, TypeDescriptor, TypeKind};

/// `<type> <name>`, where the name is the trailing word
static TYPE_AND_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^(.+)\s+(\w+)$").ok());

/// Host lookups used to resolve non-scalar names
///
/// Each method is an exact-name lookup returning the host's canonical identifier.
pub trait TypeRegistry {
    /// Find a struct by name
    fn find_struct(&self, name: &str) -> Option<StructId>;

    /// Find an enum by name
    fn find_enum(&self, name: &str) -> Option<EnumId>;

    /// Find a class by name
    fn find_class(&self, name: &str) -> Option<ClassId>;
}

/// Outcome of [`Resolver::resolve_lenient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LenientResolution {
    /// The signature resolved
    Resolved(TypeDescriptor),
    /// The signature did not resolve; the caller asked for a wildcard instead of an error
    Wildcard {
        /// The signature as supplied
        signature: String,
    },
}

impl LenientResolution {
    /// The descriptor, when resolution succeeded
    #[must_use]
    pub const fn descriptor(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Resolved(descriptor) => Some(descriptor),
            Self::Wildcard { .. } => None,
        }
    }
}

/// A named, typed parameter parsed from a declaration such as `Array<int32> Foo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Parameter name
    pub name:       String,
    /// Resolved parameter type
    pub descriptor: TypeDescriptor,
}

/// Split a declaration like `Array<int32> Foo` into its type text and name
pub fn split_type_and_name(declaration: &str) -> TypeResult<(&str, &str)> {
    let trimmed = declaration.trim();
    TYPE_AND_NAME
        .as_ref()
        .and_then(|pattern| pattern.captures(trimmed))
        .and_then(|captures| {
            let type_text = captures.get(1)?.as_str().trim();
            let name = captures.get(2)?.as_str();
            Some((type_text, name))
        })
        .ok_or_else(|| Report::new(TypeError::malformed(declaration, "expected '<type> <name>'")))
}

/// Resolves signatures against a host registry
pub struct Resolver<'a, R: TypeRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: TypeRegistry + ?Sized> Resolver<'a, R> {
    /// Create a resolver backed by `registry`
    #[must_use]
    pub const fn new(registry: &'a R) -> Self { Self { registry } }

    /// Resolve a signature, failing on any unknown name
    pub fn resolve(&self, signature: &str) -> TypeResult<TypeDescriptor> {
        let parsed = parse_signature(signature)?;
        let kind = self
            .resolve_signature(&parsed, signature)
            .attach_with(|| format!("Signature: {signature}"))?;
        debug!(signature, resolved = %kind, "Resolved type signature");
        Ok(TypeDescriptor::new(kind))
    }

    /// Resolve a signature, degrading any failure to a wildcard
    ///
    /// This is an explicit escape hatch for callers that must always produce a
    /// type. It is never used for the element types of containers.
    #[must_use]
    pub fn resolve_lenient(&self, signature: &str) -> LenientResolution {
        match self.resolve(signature) {
            Ok(descriptor) => LenientResolution::Resolved(descriptor),
            Err(report) => {
                warn!(signature, error = %report.current_context(), "Falling back to wildcard type");
                LenientResolution::Wildcard {
                    signature: signature.to_string(),
                }
            },
        }
    }

    /// Resolve a single `<type> <name>` declaration
    pub fn resolve_parameter(&self, declaration: &str) -> TypeResult<ParameterSpec> {
        let (type_text, name) = split_type_and_name(declaration)?;
        let descriptor = self.resolve(type_text)?;
        Ok(ParameterSpec {
            name: name.to_string(),
            descriptor,
        })
    }

    /// Resolve a comma-separated parameter list such as `int32 A, Array<float> B`
    ///
    /// Invalid declarations are logged and skipped; the valid ones are returned
    /// in order.
    #[must_use]
    pub fn resolve_parameters(&self, declarations: &str) -> Vec<ParameterSpec> {
        split_top_level(declarations, ',')
            .into_iter()
            .filter_map(|declaration| match self.resolve_parameter(declaration) {
                Ok(parameter) => Some(parameter),
                Err(report) => {
                    warn!(declaration, error = %report.current_context(), "Skipping invalid parameter");
                    None
                },
            })
            .collect()
    }

    fn resolve_signature(&self, signature: &TypeSignature, text: &str) -> TypeResult<TypeKind> {
        match signature {
            TypeSignature::Array(element) => Ok(TypeKind::array(self.resolve_signature(element, text)?)),
            TypeSignature::Set(element) => Ok(TypeKind::set(self.resolve_signature(element, text)?)),
            TypeSignature::Map(key, value) => {
                if key.is_container() {
                    return Err(TypeError::malformed(text, "map keys cannot be containers").into());
                }
                Ok(TypeKind::map(
                    self.resolve_signature(key, text)?,
                    self.resolve_signature(value, text)?,
                ))
            },
            TypeSignature::Pointer(name) => self
                .resolve_class(name)
                .map(|class_id| TypeKind::ObjectRef { class_id })
                .ok_or_else(|| Report::new(TypeError::UnknownType(format!("{name}*")))),
            TypeSignature::Named(name) => self.resolve_named(name),
        }
    }

    fn resolve_named(&self, name: &str) -> TypeResult<TypeKind> {
        if let Ok(keyword) = name.parse::<ScalarKeyword>() {
            return Ok(keyword.kind());
        }
        if let Some(struct_id) = self.registry.find_struct(name) {
            return Ok(TypeKind::Struct { struct_id });
        }
        if let Some(enum_id) = self.registry.find_enum(name) {
            return Ok(TypeKind::Enum { enum_id });
        }
        self.resolve_class(name)
            .map(|class_id| TypeKind::ObjectRef { class_id })
            .ok_or_else(|| Report::new(TypeError::UnknownType(name.to_string())))
    }

    fn resolve_class(&self, name: &str) -> Option<ClassId> {
        class_candidates(name)
            .iter()
            .find_map(|candidate| self.registry.find_class(candidate))
    }
}
