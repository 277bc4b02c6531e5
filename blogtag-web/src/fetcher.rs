use crate::cache::{ArticleCache, CacheStatus};
use crate::extract::ContentExtractor;
use blogtag_common::BlogtagError;
use blogtag_http::{HttpClient, HttpError, RequestOpts};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    pub text: String,
    pub cache: CacheStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to download {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: HttpError,
    },
    #[error("cache error at {}: {source}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<FetchError> for BlogtagError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Http { url, source } => BlogtagError::Fetch {
                target: url,
                message: source.to_string(),
            },
            FetchError::Cache { path, source } => BlogtagError::Fetch {
                target: path.display().to_string(),
                message: source.to_string(),
            },
        }
    }
}

/// Anything that can turn an article URL into its text.
#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    /// Make sure the raw article is available locally.
    async fn download(&self, url: &str) -> Result<CacheStatus, FetchError>;

    /// Article text, downloading first if needed.
    async fn fetch(&self, url: &str) -> Result<Article, FetchError>;
}

/// HTTP-backed source with a skip-if-present disk cache.
#[derive(Debug, Clone)]
pub struct ArticleFetcher {
    http: HttpClient,
    cache: ArticleCache,
    extractor: ContentExtractor,
}

impl ArticleFetcher {
    pub fn new(http: HttpClient, cache: ArticleCache, extractor: ContentExtractor) -> Self {
        Self {
            http,
            cache,
            extractor,
        }
    }

    pub fn cache(&self) -> &ArticleCache {
        &self.cache
    }

    async fn raw(&self, url: &str) -> Result<(Vec<u8>, CacheStatus), FetchError> {
        let path = self.cache.path_for(url);
        let cache_err = |source| FetchError::Cache {
            path: path.clone(),
            source,
        };

        if self.cache.contains(url).await.map_err(cache_err)? {
            let bytes = self.cache.read(url).await.map_err(cache_err)?;
            tracing::debug!(%url, path = %path.display(), bytes = bytes.len(), "fetch.cache.hit");
            return Ok((bytes, CacheStatus::Hit));
        }

        let bytes = self
            .http
            .get_bytes(url, RequestOpts::default())
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;
        self.cache.write(url, &bytes).await.map_err(cache_err)?;
        tracing::info!(%url, path = %path.display(), bytes = bytes.len(), "fetch.cache.stored");
        Ok((bytes.to_vec(), CacheStatus::Stored))
    }
}

#[async_trait::async_trait]
impl ArticleSource for ArticleFetcher {
    async fn download(&self, url: &str) -> Result<CacheStatus, FetchError> {
        self.raw(url).await.map(|(_, status)| status)
    }

    async fn fetch(&self, url: &str) -> Result<Article, FetchError> {
        let (bytes, cache) = self.raw(url).await?;
        let html = String::from_utf8_lossy(&bytes);
        let text = self.extractor.main_text(&html);
        Ok(Article {
            url: url.to_string(),
            text,
            cache,
        })
    }
}
