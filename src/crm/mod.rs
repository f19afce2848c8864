// ABOUTME: CRM module - bulk record fetching and single-record mutations.
// ABOUTME: The fetcher is generic over PageSource so it runs without a network.

mod client;
pub mod fetcher;
mod types;

pub use client::*;
pub use fetcher::{ODataPages, PageSource, PaginatedFetcher, StopRule};
pub use types::*;

#[cfg(test)]
mod types_test;
