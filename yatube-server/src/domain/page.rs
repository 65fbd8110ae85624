use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
}

impl PageRequest {
    pub fn new(number: u32) -> Self {
        Self {
            number: number.max(1),
        }
    }

    /// Lenient parse of the `page` query value: anything that is not a
    /// positive integer falls back to the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        let number = raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(1);
        Self::new(number)
    }

    pub fn number(&self) -> u32 {
        self.number
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u32,
}

impl Paginator {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn window(&self, request: PageRequest) -> (i64, i64) {
        let limit = i64::from(self.per_page);
        let offset = i64::from(request.number() - 1) * limit;
        (limit, offset)
    }

    pub fn page<T>(&self, items: Vec<T>, request: PageRequest, total_count: i64) -> Page<T> {
        Page {
            items,
            number: request.number(),
            per_page: self.per_page,
            total_count: total_count.max(0) as u64,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub per_page: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn num_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page);
        let pages = self.total_count.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u32> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u32> {
        self.has_previous()
            .then(|| (self.number - 1).min(self.num_pages()))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: u64, number: u32) -> Page<u64> {
        let paginator = Paginator::default();
        let request = PageRequest::new(number);
        let (limit, offset) = paginator.window(request);
        let items = (0..total)
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        paginator.page(items, request, total as i64)
    }

    #[test]
    fn thirteen_items_split_into_ten_and_three() {
        let first = page_of(13, 1);
        assert_eq!(first.len(), 10);
        assert_eq!(first.num_pages(), 2);
        assert!(first.has_next());
        assert!(!first.has_previous());
        assert_eq!(first.next_page_number(), Some(2));

        let second = page_of(13, 2);
        assert_eq!(second.len(), 3);
        assert!(!second.has_next());
        assert_eq!(second.previous_page_number(), Some(1));
    }

    #[test]
    fn page_sizes_follow_min_rule() {
        for total in [0u64, 1, 9, 10, 11, 20, 25] {
            assert_eq!(page_of(total, 1).len() as u64, total.min(10));
            assert_eq!(
                page_of(total, 2).len() as u64,
                total.saturating_sub(10).min(10)
            );
        }
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = page_of(13, 5);
        assert!(page.is_empty());
        assert_eq!(page.number, 5);
        assert!(!page.has_next());
        assert_eq!(page.previous_page_number(), Some(2));
    }

    #[test]
    fn empty_listing_has_one_page() {
        let page = page_of(0, 1);
        assert_eq!(page.num_pages(), 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn bad_page_values_fall_back_to_first() {
        assert_eq!(PageRequest::parse(None).number(), 1);
        assert_eq!(PageRequest::parse(Some("abc")).number(), 1);
        assert_eq!(PageRequest::parse(Some("0")).number(), 1);
        assert_eq!(PageRequest::parse(Some("-3")).number(), 1);
        assert_eq!(PageRequest::parse(Some("2")).number(), 2);
    }

    #[test]
    fn window_is_offset_by_whole_pages() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.window(PageRequest::new(1)), (10, 0));
        assert_eq!(paginator.window(PageRequest::new(3)), (10, 20));
    }
}
