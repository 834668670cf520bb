//! Filter type definitions
//!
//! Typed predicates over product fields and their SQL rendering.

use crate::data::types::ProductCategory;
use crate::utils::sql::{contains_pattern, fold_case};

/// Comparison operator of a filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Parse the bracketed operator suffix of a filter key (`gte` in `price[gte]`).
    ///
    /// Equality is expressed by a bare key, so `eq` is not a suffix.
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// Product fields accepted as generic filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Description,
    Category,
    Brand,
    Price,
    Ratings,
    Stock,
    NumOfReviews,
}

impl ProductField {
    pub const ALL: [ProductField; 8] = [
        ProductField::Name,
        ProductField::Description,
        ProductField::Category,
        ProductField::Brand,
        ProductField::Price,
        ProductField::Ratings,
        ProductField::Stock,
        ProductField::NumOfReviews,
    ];

    /// Parse a query parameter name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == s)
    }

    /// Column name (identical to the query parameter name)
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "category",
            Self::Brand => "brand",
            Self::Price => "price",
            Self::Ratings => "ratings",
            Self::Stock => "stock",
            Self::NumOfReviews => "num_of_reviews",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Price | Self::Ratings | Self::Stock | Self::NumOfReviews
        )
    }
}

/// Value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Real(f64),
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

/// A boolean condition on a single product field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match on the product name
    NameContains(String),
    Category(ProductCategory),
    /// Exact match on a free-text field
    Text {
        field: ProductField,
        value: String,
    },
    Number {
        field: ProductField,
        op: CompareOp,
        value: f64,
    },
}

impl Predicate {
    /// Generate SQL WHERE clause fragment
    /// Returns the SQL clause with ? placeholders and updates params
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            // Both sides are pre-folded; LIKE's own folding is ASCII only
            Self::NameContains(keyword) => {
                params
                    .values
                    .push(SqlValue::Text(contains_pattern(&fold_case(keyword))));
                "name_folded LIKE ? ESCAPE '\\'".to_string()
            }
            Self::Category(category) => {
                params
                    .values
                    .push(SqlValue::Text(category.as_str().to_string()));
                "category = ?".to_string()
            }
            Self::Text { field, value } => {
                params.values.push(SqlValue::Text(value.clone()));
                format!("{} = ?", field.column())
            }
            Self::Number { field, op, value } => {
                params.values.push(SqlValue::Real(*value));
                format!("{} {} ?", field.column(), op.as_sql())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_op_from_suffix() {
        assert_eq!(CompareOp::from_suffix("gt"), Some(CompareOp::Gt));
        assert_eq!(CompareOp::from_suffix("gte"), Some(CompareOp::Gte));
        assert_eq!(CompareOp::from_suffix("lt"), Some(CompareOp::Lt));
        assert_eq!(CompareOp::from_suffix("lte"), Some(CompareOp::Lte));
        assert_eq!(CompareOp::from_suffix("eq"), None);
        assert_eq!(CompareOp::from_suffix("$gt"), None);
        assert_eq!(CompareOp::from_suffix("GTE"), None);
    }

    #[test]
    fn test_product_field_parse() {
        assert_eq!(ProductField::parse("price"), Some(ProductField::Price));
        assert_eq!(
            ProductField::parse("num_of_reviews"),
            Some(ProductField::NumOfReviews)
        );
        assert_eq!(ProductField::parse("name"), Some(ProductField::Name));
        assert_eq!(
            ProductField::parse("description"),
            Some(ProductField::Description)
        );
        assert_eq!(ProductField::parse("id"), None);
        assert_eq!(ProductField::parse("name_folded"), None);
    }

    #[test]
    fn test_numeric_fields() {
        assert!(ProductField::Price.is_numeric());
        assert!(ProductField::Stock.is_numeric());
        assert!(!ProductField::Brand.is_numeric());
        assert!(!ProductField::Category.is_numeric());
        assert!(!ProductField::Name.is_numeric());
    }

    #[test]
    fn test_name_contains_to_sql_escapes_pattern() {
        let mut params = SqlParams::default();
        let sql = Predicate::NameContains("50%".to_string()).to_sql(&mut params);
        assert_eq!(sql, "name_folded LIKE ? ESCAPE '\\'");
        assert_eq!(params.values, vec![SqlValue::Text("%50\\%%".to_string())]);
    }

    #[test]
    fn test_name_contains_folds_keyword() {
        let mut params = SqlParams::default();
        Predicate::NameContains("ÉCRAN".to_string()).to_sql(&mut params);
        assert_eq!(params.values, vec![SqlValue::Text("%écran%".to_string())]);
    }

    #[test]
    fn test_text_equality_to_sql() {
        let mut params = SqlParams::default();
        let sql = Predicate::Text {
            field: ProductField::Name,
            value: "Pixel".to_string(),
        }
        .to_sql(&mut params);
        assert_eq!(sql, "name = ?");
        assert_eq!(params.values, vec![SqlValue::Text("Pixel".to_string())]);
    }

    #[test]
    fn test_number_to_sql() {
        let mut params = SqlParams::default();
        let sql = Predicate::Number {
            field: ProductField::Price,
            op: CompareOp::Gte,
            value: 100.0,
        }
        .to_sql(&mut params);
        assert_eq!(sql, "price >= ?");
        assert_eq!(params.values, vec![SqlValue::Real(100.0)]);
    }

    #[test]
    fn test_params_keep_insertion_order() {
        let mut params = SqlParams::default();
        Predicate::Category(ProductCategory::Phones).to_sql(&mut params);
        Predicate::Text {
            field: ProductField::Brand,
            value: "Acme".to_string(),
        }
        .to_sql(&mut params);
        assert_eq!(
            params.values,
            vec![
                SqlValue::Text("phones".to_string()),
                SqlValue::Text("Acme".to_string())
            ]
        );
    }
}
