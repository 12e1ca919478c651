use std::convert::Infallible;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use crate::deals::{Deal, PageResult};
use crate::query::PageRequest;

/// Executes page requests against some store of deals.
pub trait ResultSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches one page window plus the total match count.
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<PageResult, Self::Error>> + Send;
}

/// Serves requests from an in-memory list of deals by evaluating the
/// request's predicates directly.
///
/// Every request it receives is recorded and can be inspected with
/// [`MemorySource::requests`].
#[derive(Debug, Default)]
pub struct MemorySource {
    deals: Vec<Deal>,
    requests: Mutex<Vec<PageRequest>>,
}

impl MemorySource {
    #[must_use]
    pub fn new(deals: Vec<Deal>) -> Self {
        Self {
            deals,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests served so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn page(&self, request: &PageRequest) -> PageResult {
        let matching: Vec<&Deal> = self.deals.iter().filter(|d| request.matches(d)).collect();
        let total_count = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.page_size).unwrap_or(usize::MAX);

        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        PageResult::new(items, total_count)
    }
}

impl ResultSource for MemorySource {
    type Error = Infallible;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, Infallible> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        Ok(self.page(request))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::filters::FilterState;
    use crate::query::build;

    fn catalog(n: usize) -> Vec<Deal> {
        (0..n)
            .map(|i| Deal {
                hash_id: format!("deal-{i}"),
                title: Some(format!("Deal {i}")),
                category: Some(if i % 2 == 0 { "Sport" } else { "Travel" }.to_string()),
                price: Some(Decimal::from(10 + i)),
                ..Deal::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn windows_matching_deals_by_page() {
        let source = MemorySource::new(catalog(25));
        let filters = FilterState::default();

        let first = source.fetch_page(&build(&filters, 1, 10)).await.unwrap();
        assert_eq!(first.total_count, 25);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].hash_id, "deal-0");

        let last = source.fetch_page(&build(&filters, 3, 10)).await.unwrap();
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[4].hash_id, "deal-24");

        let past_end = source.fetch_page(&build(&filters, 4, 10)).await.unwrap();
        assert!(past_end.is_empty());
        assert_eq!(past_end.total_count, 25);
    }

    #[tokio::test]
    async fn total_counts_only_matching_deals() {
        let source = MemorySource::new(catalog(25));
        let mut filters = FilterState::default();
        filters.toggle_category("Travel");

        let page = source.fetch_page(&build(&filters, 1, 10)).await.unwrap();
        assert_eq!(page.total_count, 12);
        assert!(page
            .items
            .iter()
            .all(|d| d.category.as_deref() == Some("Travel")));
    }

    #[tokio::test]
    async fn records_requests_in_order() {
        let source = MemorySource::new(catalog(3));
        let filters = FilterState::default();
        source
            .fetch_page(&build(&filters, 1, 10).with_seq(7))
            .await
            .unwrap();
        source
            .fetch_page(&build(&filters, 2, 10).with_seq(8))
            .await
            .unwrap();

        let seqs: Vec<u64> = source.requests().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![7, 8]);
    }
}
