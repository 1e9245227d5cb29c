//! Name-tag binding codec.
//!
//! External design tools encode bindings into element display names
//! with a colon-delimited prefix tag:
//!
//! - `field:<FieldName>`: text bound to a record field
//! - `address:<F1,F2,...>`: address block over an ordered field list
//! - `sequence:<start>:<prefix>:<suffix>:<padding>`: sequence number
//! - `barcode:<symbology>:<FieldName>`: linear barcode
//! - `qr:<L|M|Q|H>:<FieldName>`: QR code
//!
//! This module is strictly a parse/serialize boundary: it converts
//! between that wire form and [`ElementContent`], and nothing past it
//! touches the string encoding.

use crate::model::{ElementContent, QrLevel, SequenceSpec, Symbology, TextBinding};
use crate::SceneError;

/// Parse an element name into binding content, if it carries a tag.
/// Names without a recognized prefix are plain display names and
/// yield `None`; a recognized prefix with malformed parameters is an
/// input error.
pub fn parse_name_tag(name: &str) -> Result<Option<ElementContent>, SceneError> {
    let Some((tag, rest)) = name.split_once(':') else {
        return Ok(None);
    };

    match tag {
        "field" => {
            if rest.is_empty() {
                return Err(SceneError::BindingTag(name.to_string()));
            }
            Ok(Some(ElementContent::Text {
                binding: TextBinding::Field(rest.to_string()),
            }))
        }
        "address" => {
            let fields: Vec<String> = rest
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect();
            if fields.is_empty() {
                return Err(SceneError::BindingTag(name.to_string()));
            }
            Ok(Some(ElementContent::AddressBlock { fields }))
        }
        "sequence" => {
            let mut parts = rest.splitn(4, ':');
            let start = parts
                .next()
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<u64>())
                .transpose()
                .map_err(|_| SceneError::BindingTag(name.to_string()))?
                .unwrap_or(1);
            let prefix = parts.next().unwrap_or("").to_string();
            let suffix = parts.next().unwrap_or("").to_string();
            let padding = parts
                .next()
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<usize>())
                .transpose()
                .map_err(|_| SceneError::BindingTag(name.to_string()))?
                .unwrap_or(0);
            Ok(Some(ElementContent::Sequence {
                spec: SequenceSpec { start, prefix, suffix, padding },
            }))
        }
        "barcode" => {
            let (sym, field) = rest
                .split_once(':')
                .ok_or_else(|| SceneError::BindingTag(name.to_string()))?;
            let symbology: Symbology = sym
                .parse()
                .map_err(|_| SceneError::BindingTag(name.to_string()))?;
            if field.is_empty() {
                return Err(SceneError::BindingTag(name.to_string()));
            }
            Ok(Some(ElementContent::Barcode {
                symbology,
                binding: TextBinding::Field(field.to_string()),
            }))
        }
        "qr" => {
            let (level, field) = rest
                .split_once(':')
                .ok_or_else(|| SceneError::BindingTag(name.to_string()))?;
            let ec_level = match level {
                "L" => QrLevel::L,
                "M" => QrLevel::M,
                "Q" => QrLevel::Q,
                "H" => QrLevel::H,
                _ => return Err(SceneError::BindingTag(name.to_string())),
            };
            if field.is_empty() {
                return Err(SceneError::BindingTag(name.to_string()));
            }
            Ok(Some(ElementContent::QrCode {
                ec_level,
                binding: TextBinding::Field(field.to_string()),
            }))
        }
        _ => Ok(None),
    }
}

/// Render binding content back into its name-tag form, for round-trips
/// through tools that only understand the string encoding.
pub fn to_name_tag(content: &ElementContent) -> Option<String> {
    match content {
        ElementContent::Text { binding: TextBinding::Field(field) } => {
            Some(format!("field:{}", field))
        }
        ElementContent::AddressBlock { fields } => {
            Some(format!("address:{}", fields.join(",")))
        }
        ElementContent::Sequence { spec } => Some(format!(
            "sequence:{}:{}:{}:{}",
            spec.start, spec.prefix, spec.suffix, spec.padding
        )),
        ElementContent::Barcode { symbology, binding: TextBinding::Field(field) } => {
            let sym = match symbology {
                Symbology::Code128 => "code128",
                Symbology::Code39 => "code39",
                Symbology::Ean13 => "ean13",
                Symbology::UpcA => "upca",
            };
            Some(format!("barcode:{}:{}", sym, field))
        }
        ElementContent::QrCode { ec_level, binding: TextBinding::Field(field) } => {
            let level = match ec_level {
                QrLevel::L => "L",
                QrLevel::M => "M",
                QrLevel::Q => "Q",
                QrLevel::H => "H",
            };
            Some(format!("qr:{}:{}", level, field))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_tag() {
        let content = parse_name_tag("field:Company Name").unwrap().unwrap();
        match content {
            ElementContent::Text { binding: TextBinding::Field(f) } => {
                assert_eq!(f, "Company Name")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parses_address_field_list_in_order() {
        let content = parse_name_tag("address:Name, Street ,City").unwrap().unwrap();
        match content {
            ElementContent::AddressBlock { fields } => {
                assert_eq!(fields, ["Name", "Street", "City"])
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parses_sequence_parameters() {
        let content = parse_name_tag("sequence:100:INV-::4").unwrap().unwrap();
        match content {
            ElementContent::Sequence { spec } => {
                assert_eq!(spec, SequenceSpec {
                    start: 100,
                    prefix: "INV-".into(),
                    suffix: String::new(),
                    padding: 4,
                });
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parses_barcode_and_qr_tags() {
        assert!(matches!(
            parse_name_tag("barcode:ean13:SKU").unwrap().unwrap(),
            ElementContent::Barcode { symbology: Symbology::Ean13, .. }
        ));
        assert!(matches!(
            parse_name_tag("qr:H:Url").unwrap().unwrap(),
            ElementContent::QrCode { ec_level: QrLevel::H, .. }
        ));
    }

    #[test]
    fn plain_names_are_not_bindings() {
        assert!(parse_name_tag("Header").unwrap().is_none());
        assert!(parse_name_tag("logo:main").unwrap().is_none());
    }

    #[test]
    fn malformed_parameters_are_errors() {
        assert!(parse_name_tag("sequence:abc").is_err());
        assert!(parse_name_tag("barcode:nope:SKU").is_err());
        assert!(parse_name_tag("qr:X:Url").is_err());
        assert!(parse_name_tag("field:").is_err());
    }

    #[test]
    fn tag_round_trip() {
        for tag in ["field:Name", "address:A,B", "sequence:1:P-:-S:3", "barcode:code128:Id", "qr:M:Url"] {
            let content = parse_name_tag(tag).unwrap().unwrap();
            assert_eq!(to_name_tag(&content).as_deref(), Some(tag));
        }
    }
}
