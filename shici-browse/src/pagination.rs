//! Pagination utilities
//!
//! Result lists are shown 10 poems per page.

/// Page size constant for all pagination
pub const PAGE_SIZE: usize = 10;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Index of the first item on the page
    pub offset: usize,
}

impl Pagination {
    /// Items of `items` that fall on this page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = (start + PAGE_SIZE).min(items.len());
        &items[start..end]
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages]
///
/// # Examples
/// ```
/// use shici_browse::pagination::calculate_pagination;
///
/// // 25 total results = 3 pages (10 + 10 + 5)
/// let p = calculate_pagination(25, 2);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 10);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(25, 99);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 20);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: usize) -> Pagination {
    let total_pages = total_results.div_ceil(PAGE_SIZE);
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * PAGE_SIZE;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(25, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(15, 0);
        assert_eq!(p.page, 1); // Clamped to first page
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(20, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn test_slice_last_partial_page() {
        let items: Vec<usize> = (0..23).collect();
        let p = calculate_pagination(items.len(), 3);
        assert_eq!(p.slice(&items), &[20, 21, 22]);
    }

    #[test]
    fn test_slice_empty() {
        let items: Vec<usize> = Vec::new();
        let p = calculate_pagination(0, 5);
        assert!(p.slice(&items).is_empty());
    }
}
