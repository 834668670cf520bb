//! Filter parsing
//!
//! Turns raw query-string pairs (`category=phones`, `price[gte]=100`) into
//! typed predicates with validation.

use crate::api::types::ApiError;
use crate::core::constants::MAX_FILTER_PARAMS;
use crate::data::types::ProductCategory;

use super::types::{CompareOp, Predicate, ProductField};

/// Keys consumed by the search and pagination stages
pub const RESERVED_KEYS: &[&str] = &["keyword", "limit", "page"];

/// Field name of a filter key, without any `[op]` suffix
fn base_name(key: &str) -> &str {
    key.split_once('[').map_or(key, |(name, _)| name)
}

/// Check whether a key belongs to the search or pagination stage
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&base_name(key))
}

/// Split `field[op]` into field name and operator; a bare key means equality
fn split_key(key: &str) -> Result<(&str, CompareOp), ApiError> {
    let Some((name, rest)) = key.split_once('[') else {
        return Ok((key, CompareOp::Eq));
    };

    rest.strip_suffix(']')
        .and_then(CompareOp::from_suffix)
        .map(|op| (name, op))
        .ok_or_else(|| {
            ApiError::bad_request(
                "INVALID_FILTER_OPERATOR",
                format!(
                    "Invalid filter operator in '{}'. Use one of: gt, gte, lt, lte",
                    key
                ),
            )
        })
}

fn parse_number(key: &str, value: &str) -> Result<f64, ApiError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            ApiError::bad_request(
                "INVALID_FILTER_VALUE",
                format!("Filter '{}' expects a number, got '{}'", key, value),
            )
        })
}

/// Parse a single non-reserved key/value pair into a predicate
pub fn parse_predicate(key: &str, value: &str) -> Result<Predicate, ApiError> {
    let (name, op) = split_key(key)?;

    let field = ProductField::parse(name).ok_or_else(|| {
        ApiError::bad_request(
            "INVALID_FILTER_FIELD",
            format!("Cannot filter by field: {}", name),
        )
    })?;

    if field.is_numeric() {
        let value = parse_number(key, value)?;
        return Ok(Predicate::Number { field, op, value });
    }

    if op != CompareOp::Eq {
        return Err(ApiError::bad_request(
            "INVALID_FILTER_OPERATOR",
            format!("Field '{}' only supports equality", name),
        ));
    }

    match field {
        ProductField::Category => ProductCategory::parse(value)
            .map(Predicate::Category)
            .ok_or_else(|| {
                ApiError::bad_request(
                    "INVALID_CATEGORY",
                    format!(
                        "Invalid category '{}'. Valid: phones, gadgets, accessories, other",
                        value
                    ),
                )
            }),
        _ => Ok(Predicate::Text {
            field,
            value: value.to_string(),
        }),
    }
}

/// Parse every non-reserved pair into predicates (ANDed by the caller)
pub fn parse_filter_params(params: &[(String, String)]) -> Result<Vec<Predicate>, ApiError> {
    let candidates: Vec<&(String, String)> =
        params.iter().filter(|(key, _)| !is_reserved(key)).collect();

    if candidates.len() > MAX_FILTER_PARAMS {
        return Err(ApiError::bad_request(
            "TOO_MANY_FILTERS",
            format!("Maximum {} filters allowed", MAX_FILTER_PARAMS),
        ));
    }

    candidates
        .into_iter()
        .map(|(key, value)| parse_predicate(key, value))
        .collect()
}

/// Page number from the `page` parameter, clamped to >= 1.
///
/// Any integral value is accepted, including float spellings such as `2.0`
/// or `1e1`. Values past `u64::MAX` saturate so an out-of-range page reads
/// as an empty window instead of the first page.
pub fn parse_page(value: Option<&str>) -> u64 {
    let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return 1;
    };
    if let Ok(page) = v.parse::<u64>() {
        return page.max(1);
    }
    if v.bytes().all(|b| b.is_ascii_digit()) {
        return u64::MAX;
    }
    match v.parse::<f64>() {
        // Float to int casts saturate
        Ok(page) if page >= 1.0 && (page.is_infinite() || page.fract() == 0.0) => page as u64,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn error_code(err: ApiError) -> String {
        match err {
            ApiError::BadRequest { code, .. } => code,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn parse_range_pair() {
        let predicates =
            parse_filter_params(&pairs(&[("price[gte]", "100"), ("price[lte]", "500")])).unwrap();
        assert_eq!(
            predicates,
            vec![
                Predicate::Number {
                    field: ProductField::Price,
                    op: CompareOp::Gte,
                    value: 100.0
                },
                Predicate::Number {
                    field: ProductField::Price,
                    op: CompareOp::Lte,
                    value: 500.0
                },
            ]
        );
    }

    #[test]
    fn parse_bare_key_is_equality() {
        let predicates =
            parse_filter_params(&pairs(&[("category", "phones"), ("stock", "3")])).unwrap();
        assert_eq!(
            predicates,
            vec![
                Predicate::Category(ProductCategory::Phones),
                Predicate::Number {
                    field: ProductField::Stock,
                    op: CompareOp::Eq,
                    value: 3.0
                },
            ]
        );
    }

    #[test]
    fn reserved_keys_are_never_filters() {
        let predicates = parse_filter_params(&pairs(&[
            ("keyword", "phone"),
            ("limit", "5"),
            ("page", "2"),
            ("page[gte]", "2"),
            ("brand", "Acme"),
        ]))
        .unwrap();
        assert_eq!(
            predicates,
            vec![Predicate::Text {
                field: ProductField::Brand,
                value: "Acme".to_string()
            }]
        );
    }

    #[test]
    fn reserved_only_yields_no_predicates() {
        let predicates =
            parse_filter_params(&pairs(&[("keyword", "x"), ("limit", "abc"), ("page", "-1")]))
                .unwrap();
        assert!(predicates.is_empty());
    }

    #[test]
    fn non_numeric_value_is_client_error() {
        let err = parse_filter_params(&pairs(&[("price[gte]", "cheap")])).unwrap_err();
        assert_eq!(error_code(err), "INVALID_FILTER_VALUE");

        let err = parse_filter_params(&pairs(&[("ratings", "NaN")])).unwrap_err();
        assert_eq!(error_code(err), "INVALID_FILTER_VALUE");

        let err = parse_filter_params(&pairs(&[("stock[lt]", "inf")])).unwrap_err();
        assert_eq!(error_code(err), "INVALID_FILTER_VALUE");
    }

    #[test]
    fn invalid_category_is_client_error() {
        let err = parse_filter_params(&pairs(&[("category", "laptops")])).unwrap_err();
        assert_eq!(error_code(err), "INVALID_CATEGORY");
    }

    #[test]
    fn unknown_field_is_client_error() {
        let err = parse_filter_params(&pairs(&[("color", "red")])).unwrap_err();
        assert_eq!(error_code(err), "INVALID_FILTER_FIELD");
    }

    #[test]
    fn invalid_operator_is_client_error() {
        for key in ["price[ne]", "price[gte", "price[]", "price[$gt]"] {
            let err = parse_filter_params(&pairs(&[(key, "1")])).unwrap_err();
            assert_eq!(error_code(err), "INVALID_FILTER_OPERATOR", "key {}", key);
        }
    }

    #[test]
    fn range_on_text_field_is_rejected() {
        for key in ["brand[gt]", "name[gt]", "description[lte]"] {
            let err = parse_filter_params(&pairs(&[(key, "A")])).unwrap_err();
            assert_eq!(error_code(err), "INVALID_FILTER_OPERATOR", "key {}", key);
        }
    }

    #[test]
    fn name_and_description_equality() {
        let predicates = parse_filter_params(&pairs(&[
            ("name", "Pixel"),
            ("description", "A product"),
        ]))
        .unwrap();
        assert_eq!(
            predicates,
            vec![
                Predicate::Text {
                    field: ProductField::Name,
                    value: "Pixel".to_string()
                },
                Predicate::Text {
                    field: ProductField::Description,
                    value: "A product".to_string()
                },
            ]
        );
    }

    #[test]
    fn too_many_filters() {
        let many: Vec<(String, String)> = (0..=MAX_FILTER_PARAMS)
            .map(|_| ("brand".to_string(), "Acme".to_string()))
            .collect();
        let err = parse_filter_params(&many).unwrap_err();
        assert_eq!(error_code(err), "TOO_MANY_FILTERS");
    }

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some("2.5")), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some(" 7 ")), 7);
    }

    #[test]
    fn page_accepts_integral_floats() {
        assert_eq!(parse_page(Some("2.0")), 2);
        assert_eq!(parse_page(Some("1e1")), 10);
        assert_eq!(parse_page(Some("+4")), 4);
        assert_eq!(parse_page(Some("0.0")), 1);
        assert_eq!(parse_page(Some("-2.0")), 1);
        assert_eq!(parse_page(Some("NaN")), 1);
    }

    #[test]
    fn page_past_u64_saturates() {
        assert_eq!(parse_page(Some("18446744073709551615")), u64::MAX);
        assert_eq!(parse_page(Some("18446744073709551616")), u64::MAX);
        assert_eq!(parse_page(Some("99999999999999999999999999")), u64::MAX);
        assert_eq!(parse_page(Some("1e30")), u64::MAX);
    }
}
