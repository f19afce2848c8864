// ABOUTME: Concurrent paginated fetcher for OData-style listings.
// ABOUTME: Issues rounds of parallel page requests until a page comes back empty.

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info};

use super::{CrmClient, ODataQuery, Record, RecordBatch};
use crate::error::CrmError;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const DEFAULT_PAGES_PER_ROUND: usize = 10;

/// A source of pages addressed by row offset.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page starting at row `skip`.
    async fn fetch_page(&self, skip: u64) -> Result<RecordBatch, CrmError>;
}

/// When a round ends the fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopRule {
    /// Stop after a round in which any page returned zero rows.
    ///
    /// Offsets still advance by the full round width, so a server whose
    /// pages are shorter than `page_size` has rows skipped.
    #[default]
    EmptyPage,
    /// Also stop after a round in which any page returned fewer than
    /// `page_size` rows.
    ShortPage,
}

/// Fetches every row of a listing in concurrent rounds.
///
/// Each round requests `pages_per_round` contiguous pages at once and waits
/// for all of them. Any error aborts the fetch; no partial result is returned.
#[derive(Debug, Clone)]
pub struct PaginatedFetcher {
    page_size: u64,
    pages_per_round: usize,
    stop_rule: StopRule,
}

impl Default for PaginatedFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGES_PER_ROUND)
    }
}

impl PaginatedFetcher {
    /// # Panics
    ///
    /// Panics if `page_size` or `pages_per_round` is zero.
    pub fn new(page_size: u64, pages_per_round: usize) -> Self {
        assert!(page_size > 0, "page_size must be positive");
        assert!(pages_per_round > 0, "pages_per_round must be positive");

        Self {
            page_size,
            pages_per_round,
            stop_rule: StopRule::default(),
        }
    }

    pub fn stop_rule(mut self, stop_rule: StopRule) -> Self {
        self.stop_rule = stop_rule;
        self
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Offset stride between consecutive rounds.
    pub fn round_width(&self) -> u64 {
        self.page_size * self.pages_per_round as u64
    }

    /// Offsets requested by the round starting at `skip`.
    pub fn round_offsets(&self, skip: u64) -> Vec<u64> {
        (0..self.pages_per_round as u64)
            .map(|i| skip + i * self.page_size)
            .collect()
    }

    /// Fetch all rows. Returns `None` if the first round produced nothing.
    pub async fn fetch_all<S>(&self, source: &S) -> Result<Option<Vec<Record>>, CrmError>
    where
        S: PageSource + ?Sized,
    {
        let mut rows: Vec<Record> = Vec::new();
        let mut skip = 0;
        let mut rounds = 0usize;

        loop {
            let offsets = self.round_offsets(skip);
            let pages = try_join_all(offsets.iter().map(|&offset| source.fetch_page(offset))).await?;
            rounds += 1;

            let mut last_round = false;
            for page in pages {
                let len = page.len() as u64;
                if len == 0 || (self.stop_rule == StopRule::ShortPage && len < self.page_size) {
                    last_round = true;
                }
                rows.extend(page);
            }

            debug!(round = rounds, skip, total_rows = rows.len(), "round complete");

            if last_round {
                break;
            }
            skip += self.round_width();
        }

        info!(rounds, total_rows = rows.len(), "paginated fetch finished");

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows))
        }
    }
}

/// `PageSource` over an OData entity set such as `Contacts` or `Properties`.
pub struct ODataPages<'a> {
    client: &'a CrmClient,
    entity: String,
    query: ODataQuery,
}

impl<'a> ODataPages<'a> {
    pub fn new(client: &'a CrmClient, entity: impl Into<String>) -> Self {
        Self {
            client,
            entity: entity.into(),
            query: ODataQuery::default(),
        }
    }

    pub fn query(mut self, query: ODataQuery) -> Self {
        self.query = query;
        self
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }
}

#[async_trait]
impl PageSource for ODataPages<'_> {
    async fn fetch_page(&self, skip: u64) -> Result<RecordBatch, CrmError> {
        self.client.odata_page(&self.entity, &self.query, skip).await
    }
}
