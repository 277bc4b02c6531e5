//! Article acquisition utilities.
//!
//! - On-disk cache of raw downloads keyed by a sanitised URL (`cache`)
//! - Main-content text extraction from HTML (`extract`)
//! - The [`ArticleSource`] seam and its HTTP + cache implementation (`fetcher`)

pub mod cache;
pub mod extract;
pub mod fetcher;

pub use cache::{cache_key, ArticleCache, CacheStatus};
pub use extract::ContentExtractor;
pub use fetcher::{Article, ArticleFetcher, ArticleSource, FetchError};
