//! Value checks against a property's semantic type.

use proto_model::{PropValue, PropertyDefinition, SemanticType};

use crate::error::{PropertyError, Result};

/// Check that `value` fits `def`.
///
/// Numbers must be finite, booleans must be booleans, and everything else
/// is text. A non-empty option list restricts text values, except for icon
/// references, which name host assets the catalogue cannot enumerate.
pub fn validate_value(def: &PropertyDefinition, value: &PropValue) -> Result<()> {
    match (def.semantic_type, value) {
        (SemanticType::Number, PropValue::Number(n)) if n.is_finite() => Ok(()),
        (SemanticType::Boolean, PropValue::Bool(_)) => Ok(()),
        (SemanticType::Number | SemanticType::Boolean, other) => Err(mismatch(def, other)),
        (_, PropValue::Text(text)) => check_option(def, text),
        (_, other) => Err(mismatch(def, other)),
    }
}

/// Turn user-entered text into a typed, validated value.
pub fn parse_value(def: &PropertyDefinition, raw: &str) -> Result<PropValue> {
    let value = match def.semantic_type {
        SemanticType::Number => {
            let number = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| unparseable(def, raw))?;
            PropValue::Number(number)
        }
        SemanticType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => PropValue::Bool(true),
            "false" | "no" | "off" | "0" => PropValue::Bool(false),
            _ => return Err(unparseable(def, raw)),
        },
        _ => PropValue::Text(raw.to_string()),
    };
    validate_value(def, &value)?;
    Ok(value)
}

fn check_option(def: &PropertyDefinition, text: &str) -> Result<()> {
    if def.is_icon_reference || def.enum_options.is_empty() {
        return Ok(());
    }
    if def.enum_options.iter().any(|option| option == text) {
        Ok(())
    } else {
        Err(PropertyError::NotAnOption {
            property: def.name.clone(),
            value: text.to_string(),
            options: def.enum_options.clone(),
        })
    }
}

fn expected(def: &PropertyDefinition) -> &'static str {
    match def.semantic_type {
        SemanticType::Number => "number",
        SemanticType::Boolean => "boolean",
        _ => "text",
    }
}

fn mismatch(def: &PropertyDefinition, found: &PropValue) -> PropertyError {
    PropertyError::TypeMismatch {
        property: def.name.clone(),
        expected: expected(def),
        found: found.kind(),
    }
}

fn unparseable(def: &PropertyDefinition, raw: &str) -> PropertyError {
    PropertyError::Unparseable {
        property: def.name.clone(),
        raw: raw.to_string(),
        expected: expected(def),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> PropertyDefinition {
        PropertyDefinition::new("size", SemanticType::Enum).with_options(["sm", "md", "lg"])
    }

    #[test]
    fn enum_values_must_be_options() {
        assert!(validate_value(&size(), &PropValue::from("md")).is_ok());
        assert!(matches!(
            validate_value(&size(), &PropValue::from("huge")),
            Err(PropertyError::NotAnOption { .. })
        ));
        assert!(matches!(
            validate_value(&size(), &PropValue::Number(2.0)),
            Err(PropertyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn icon_enums_accept_any_name() {
        let icon = PropertyDefinition::new("icon", SemanticType::Enum).icon();
        assert!(validate_value(&icon, &PropValue::from("ArrowRight")).is_ok());
    }

    #[test]
    fn parses_numbers_and_booleans() {
        let count = PropertyDefinition::new("columnCount", SemanticType::Number);
        assert_eq!(parse_value(&count, " 4 ").unwrap(), PropValue::Number(4.0));
        assert!(parse_value(&count, "four").is_err());
        assert!(parse_value(&count, "NaN").is_err());

        let flag = PropertyDefinition::new("disabled", SemanticType::Boolean);
        assert_eq!(parse_value(&flag, "Yes").unwrap(), PropValue::Bool(true));
        assert_eq!(parse_value(&flag, "false").unwrap(), PropValue::Bool(false));
        assert!(matches!(
            parse_value(&flag, "maybe"),
            Err(PropertyError::Unparseable { .. })
        ));
    }

    #[test]
    fn text_types_keep_raw_input() {
        let color = PropertyDefinition::new("iconBackgroundColor", SemanticType::Color);
        assert_eq!(
            parse_value(&color, "#ff0000").unwrap(),
            PropValue::from("#ff0000")
        );
        assert_eq!(parse_value(&size(), "lg").unwrap(), PropValue::from("lg"));
    }
}
