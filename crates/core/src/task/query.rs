//! Query descriptors for the paginated, filterable list endpoint

use super::model::TaskStatus;

/// Page size used for every list request
pub const DEFAULT_PAGE_SIZE: u32 = 4;

/// Status filter for the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// No filter parameter is sent; the server returns everything
    All,
    Only(TaskStatus),
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::All
    }
}

/// Identifies one page of one filtered view of the collection
///
/// Equality is structural so descriptors can key fetch de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    pub filter: StatusFilter,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            filter: StatusFilter::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryDescriptor {
    /// Descriptor for page 1 of the given filter
    pub fn new(filter: StatusFilter, page_size: u32) -> Self {
        Self {
            filter,
            page: 1,
            page_size,
        }
    }

    /// Replace the filter, resetting to page 1
    pub fn with_filter(self, filter: StatusFilter) -> Self {
        Self {
            filter,
            page: 1,
            page_size: self.page_size,
        }
    }

    /// The descriptor for the page after this one, same filter
    pub fn next_page(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    /// Query parameters for the list request
    ///
    /// The filter parameter is omitted entirely for `All`; the server
    /// treats its absence as unfiltered.
    pub fn request_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("pagination[page]".to_string(), self.page.to_string()),
            ("pagination[pageSize]".to_string(), self.page_size.to_string()),
        ];
        if let StatusFilter::Only(status) = self.filter {
            params.push(("filters[status]".to_string(), status.label().to_string()));
        }
        params
    }
}
