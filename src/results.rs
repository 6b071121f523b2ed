use crate::error::RenderError;
use std::sync::Arc;

/// One scraped item: values aligned with the schema's column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Create a record; `values` must have one entry per column
    pub fn new(columns: Arc<[String]>, values: Vec<String>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Value of the named field, if the schema has that field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i].as_str())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of fetching and rendering one page
#[derive(Debug)]
pub enum PageResult {
    /// Rendered HTML with content
    Html(String),
    /// The renderer returned nothing to parse
    Empty,
    /// Navigation, readiness wait or network failure
    Failed(RenderError),
}

impl PageResult {
    pub fn from_html(html: String) -> Self {
        if html.trim().is_empty() {
            PageResult::Empty
        } else {
            PageResult::Html(html)
        }
    }
}

impl From<Result<String, RenderError>> for PageResult {
    fn from(result: Result<String, RenderError>) -> Self {
        match result {
            Ok(html) => PageResult::from_html(html),
            Err(e) => PageResult::Failed(e),
        }
    }
}
