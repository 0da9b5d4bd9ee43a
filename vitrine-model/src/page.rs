use crate::product::Product;

/// Pagination metadata reported by the backend alongside a page of rows.
///
/// `page` is 1-based on the wire, unlike the 0-based request cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub pages: u32,
    pub total: u64,
}

/// One raw backend response.
///
/// `raw_count` counts every row the backend returned, deleted ones included;
/// a value below the requested size signals end-of-data.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FetchedPage {
    pub items: Vec<Product>,
    pub raw_count: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub total: Option<u64>,
}

impl FetchedPage {
    pub fn new(items: Vec<Product>) -> Self {
        let raw_count = items.len();
        Self {
            items,
            raw_count,
            total: None,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }
}

/// Page handed to the UI layer.
///
/// Holds at most `page_size` live items with distinct ids.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResultPage {
    pub items: Vec<Product>,
    pub total_count: u64,
    pub price_ceiling: f64,
}

impl ResultPage {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of UI pages needed to show `total_count` items.
    pub fn page_count(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(page_size)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetched_page_counts_raw_rows() {
        let page = FetchedPage::new(vec![
            Product::new(1, 10.0),
            Product::new(2, 20.0).deleted(true),
        ]);
        assert_eq!(page.raw_count, 2);
        assert_eq!(page.total, None);
    }

    #[test]
    fn page_count_rounds_up_and_never_reports_zero() {
        let page = ResultPage {
            total_count: 17,
            ..ResultPage::default()
        };
        assert_eq!(page.page_count(8), 3);
        assert_eq!(ResultPage::default().page_count(8), 1);
        assert_eq!(page.page_count(0), 0);
    }
}
