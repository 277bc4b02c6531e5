use std::io;
use std::path::PathBuf;

/// Whether a download was served from disk or fetched and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Stored,
}

/// Filesystem-safe name for a URL: every character outside
/// `[0-9A-Za-z._-]` becomes `_`.
///
/// ```
/// use blogtag_web::cache_key;
///
/// assert_eq!(
///     cache_key("https://blog.example/2024/05/kaigi?x=1"),
///     "https___blog.example_2024_05_kaigi_x_1"
/// );
/// ```
pub fn cache_key(url: &str) -> String {
    url.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// One file per downloaded URL under a scope directory. Holds raw bytes only.
#[derive(Debug, Clone)]
pub struct ArticleCache {
    dir: PathBuf,
}

impl ArticleCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    pub async fn contains(&self, url: &str) -> io::Result<bool> {
        tokio::fs::try_exists(self.path_for(url)).await
    }

    pub async fn read(&self, url: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path_for(url)).await
    }

    /// Persist raw bytes, creating the scope directory if needed.
    pub async fn write(&self, url: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(url);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_keeps_safe_characters() {
        assert_eq!(cache_key("a-b_c.d"), "a-b_c.d");
    }

    #[test]
    fn cache_key_replaces_each_unsafe_char() {
        assert_eq!(cache_key("a b//c"), "a_b__c");
        // one underscore per character, not per byte
        assert_eq!(cache_key("ブログ"), "___");
    }

    #[tokio::test]
    async fn write_then_read_round_trips_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ArticleCache::new(tmp.path().join("2024"));
        let url = "https://blog.example/p?id=7";

        assert!(!cache.contains(url).await.unwrap());
        let path = cache.write(url, b"<html></html>").await.unwrap();
        assert_eq!(path, tmp.path().join("2024").join("https___blog.example_p_id_7"));
        assert!(cache.contains(url).await.unwrap());
        assert_eq!(cache.read(url).await.unwrap(), b"<html></html>");
    }
}
