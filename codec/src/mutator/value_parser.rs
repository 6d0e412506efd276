//! Raw-string parsing for leaf kinds
//!
//! Parsing is strict: integers must fit the declared width and signedness, floats
//! must be finite and fit their width, and enums accept only declared enumerators
//! (by name, or by numeric value as a fallback).

use error_stack::Report;

use crate::error::{MutationError, MutationResult};
use crate::reflection::{EnumInfo, ObjectModel, PropertyValue};
use crate::type_descriptor::TypeKind;

/// Parse `raw` as a value of a scalar or enum kind
pub fn parse_leaf<H: ObjectModel + ?Sized>(host: &H, kind: &TypeKind, raw: &str) -> MutationResult<PropertyValue> {
    match kind {
        TypeKind::Integer { width, signed } => parse_integer(raw, *width, *signed).map(PropertyValue::Integer),
        TypeKind::FloatingPoint { width } => parse_float(raw, *width).map(PropertyValue::Float),
        TypeKind::Boolean => parse_bool(raw).map(PropertyValue::Bool),
        TypeKind::String => Ok(PropertyValue::String(raw.to_string())),
        TypeKind::Name => Ok(PropertyValue::Name(raw.to_string())),
        TypeKind::Text => Ok(PropertyValue::Text(raw.to_string())),
        TypeKind::Enum { enum_id } => {
            let info = host.enum_info(enum_id).ok_or_else(|| {
                Report::new(MutationError::invalid_value(raw, format_args!("unknown enum {enum_id}")))
            })?;
            parse_enum(&info, raw).map(PropertyValue::Enum)
        },
        TypeKind::ObjectRef { .. }
        | TypeKind::Struct { .. }
        | TypeKind::Array { .. }
        | TypeKind::Set { .. }
        | TypeKind::Map { .. } => Err(Report::new(MutationError::UnsupportedKind {
            kind: kind.to_string(),
        })),
    }
}

/// Parse an integer and check it against the width and signedness
pub fn parse_integer(raw: &str, width: u8, signed: bool) -> MutationResult<i64> {
    let expected = || {
        if signed {
            format!("int{width}")
        } else {
            format!("uint{width}")
        }
    };
    if !(1..=64).contains(&width) {
        return Err(Report::new(MutationError::invalid_value(raw, expected())));
    }

    let value: i128 = raw
        .trim()
        .parse()
        .map_err(|_| Report::new(MutationError::invalid_value(raw, expected())))?;
    let (min, max) = if signed {
        (-(1_i128 << (width - 1)), (1_i128 << (width - 1)) - 1)
    } else {
        (0, (1_i128 << width) - 1)
    };
    if value < min || value > max {
        return Err(Report::new(MutationError::invalid_value(raw, expected()))
            .attach(format!("Range: {min}..={max}")));
    }
    i64::try_from(value).map_err(|_| Report::new(MutationError::invalid_value(raw, expected())))
}

/// Parse a finite float that fits `width` bits
pub fn parse_float(raw: &str, width: u8) -> MutationResult<f64> {
    let expected = if width <= 32 { "float" } else { "double" };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Report::new(MutationError::invalid_value(raw, expected)))?;
    if !value.is_finite() || (width <= 32 && value.abs() > f64::from(f32::MAX)) {
        return Err(Report::new(MutationError::invalid_value(raw, expected)));
    }
    Ok(value)
}

/// `true/false/yes/no/on/off/1/0`, case-insensitive
pub fn parse_bool(raw: &str) -> MutationResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Report::new(MutationError::invalid_value(raw, "bool"))),
    }
}

/// Enumerator name first, then a numeric value that must be declared
pub fn parse_enum(info: &EnumInfo, raw: &str) -> MutationResult<i64> {
    let trimmed = raw.trim();
    if let Some(value) = info.value_of(trimmed) {
        return Ok(value);
    }
    trimmed
        .parse::<i64>()
        .ok()
        .filter(|value| info.contains_value(*value))
        .ok_or_else(|| Report::new(MutationError::invalid_value(raw, format_args!("enumerator of {}", info.id))))
}
