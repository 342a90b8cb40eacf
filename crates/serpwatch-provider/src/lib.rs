//! Search provider boundary: the SerpAPI client, payload normalization and
//! paginated collection.

pub mod client;
pub mod collect;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod provider;
pub mod types;

pub use client::SerpApiClient;
pub use collect::{build_site_query, Paginator};
pub use error::ProviderError;
pub use pagination::{PageCursor, PageStep, StopReason, PAGE_SIZE};
pub use provider::{QueryParams, SearchProvider};
pub use types::RawPage;
