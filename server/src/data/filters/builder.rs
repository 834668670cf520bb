//! Product query builder
//!
//! Composes search, filter and pagination stages into a predicate set and
//! a result window. Building performs no I/O; the repository renders the
//! query to SQL and runs the count and page fetches.

use crate::api::types::ApiError;

use super::parser::{parse_filter_params, parse_page};
use super::types::{Predicate, SqlParams};

/// Skip/limit window over the filtered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub page_size: u32,
    pub skip: u64,
}

impl PageWindow {
    pub fn new(page: u64, page_size: u32) -> Self {
        let page = page.max(1);
        Self {
            page,
            page_size,
            skip: u64::from(page_size).saturating_mul(page - 1),
        }
    }
}

/// Request-scoped product query.
///
/// Stages are chainable and meant to run as search -> filter -> paginate:
///
/// ```
/// use storefront_server::data::filters::ProductQuery;
///
/// let params = vec![
///     ("keyword".to_string(), "phone".to_string()),
///     ("price[gte]".to_string(), "100".to_string()),
///     ("page".to_string(), "2".to_string()),
/// ];
/// let query = ProductQuery::new(params).search().filter().unwrap().paginate(8);
/// assert_eq!(query.predicates().len(), 2);
/// assert_eq!(query.window().unwrap().skip, 8);
/// ```
#[derive(Debug, Clone)]
pub struct ProductQuery {
    params: Vec<(String, String)>,
    predicates: Vec<Predicate>,
    window: Option<PageWindow>,
}

impl ProductQuery {
    pub fn new(params: Vec<(String, String)>) -> Self {
        Self {
            params,
            predicates: Vec::new(),
            window: None,
        }
    }

    /// First value of a raw parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Add a name substring predicate when `keyword` is present and non-empty
    pub fn search(mut self) -> Self {
        if let Some(keyword) = self.param("keyword").filter(|k| !k.is_empty()) {
            let predicate = Predicate::NameContains(keyword.to_string());
            self.predicates.push(predicate);
        }
        self
    }

    /// Add one predicate per non-reserved parameter
    pub fn filter(mut self) -> Result<Self, ApiError> {
        let predicates = parse_filter_params(&self.params)?;
        self.predicates.extend(predicates);
        Ok(self)
    }

    /// Window the results to `page_size` items of the requested `page`
    pub fn paginate(mut self, page_size: u32) -> Self {
        let page = parse_page(self.param("page"));
        self.window = Some(PageWindow::new(page, page_size));
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn window(&self) -> Option<PageWindow> {
        self.window
    }

    /// Render the ANDed predicates as a WHERE clause (empty without predicates)
    pub fn where_clause(&self, params: &mut SqlParams) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }
        let conditions: Vec<String> = self
            .predicates
            .iter()
            .map(|p| p.to_sql(params))
            .collect();
        format!("WHERE {}", conditions.join(" AND "))
    }
}
