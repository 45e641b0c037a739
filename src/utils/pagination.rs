use serde::Serialize;

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: u64,
    pub next_page: Option<u64>,
}

impl PageWindow {
    /// Zero-based index for `Paginator::fetch_page`.
    pub fn index(&self) -> u64 {
        self.page - 1
    }
}

/// Resolves a 1-based page number against the number of available pages.
///
/// Returns `None` when the page is out of range. The first page of an empty
/// listing is valid.
pub fn resolve_page(page: i64, num_pages: u64) -> Option<PageWindow> {
    if page < 1 {
        return None;
    }
    let page = page as u64;
    if page > num_pages.max(1) {
        return None;
    }

    let next_page = if page < num_pages { Some(page + 1) } else { None };
    Some(PageWindow { page, next_page })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_empty_listing_is_valid() {
        assert_eq!(resolve_page(1, 0), Some(PageWindow { page: 1, next_page: None }));
        assert_eq!(resolve_page(2, 0), None);
    }

    #[test]
    fn pages_beyond_the_last_are_out_of_range() {
        assert_eq!(resolve_page(4, 3), None);
        assert_eq!(resolve_page(0, 3), None);
        assert_eq!(resolve_page(-1, 3), None);
    }

    #[test]
    fn next_page_only_while_more_remain() {
        assert_eq!(resolve_page(1, 3).unwrap().next_page, Some(2));
        assert_eq!(resolve_page(3, 3).unwrap().next_page, None);
        assert_eq!(resolve_page(2, 3).unwrap().index(), 1);
    }
}
