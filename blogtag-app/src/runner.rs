use crate::report::ReportWriter;
use blogtag_common::Result;
use blogtag_tagger::TagExtractor;
use blogtag_web::{ArticleSource, CacheStatus};
use std::io::Write;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub hits: usize,
    pub stored: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub articles: usize,
    pub tagged: usize,
}

/// Drives one scope: every URL in order, one at a time. The first failure
/// ends the run.
pub struct Runner<'a, W: Write> {
    source: &'a dyn ArticleSource,
    extractor: &'a TagExtractor,
    report: ReportWriter<W>,
}

impl<'a, W: Write> Runner<'a, W> {
    pub fn new(
        source: &'a dyn ArticleSource,
        extractor: &'a TagExtractor,
        report: ReportWriter<W>,
    ) -> Self {
        Self {
            source,
            extractor,
            report,
        }
    }

    /// Make sure every article is on disk before any tagging starts.
    pub async fn download_all(&self, urls: &[String]) -> Result<DownloadSummary> {
        let mut summary = DownloadSummary::default();
        for url in urls {
            match self.source.download(url).await? {
                CacheStatus::Hit => summary.hits += 1,
                CacheStatus::Stored => summary.stored += 1,
            }
        }
        tracing::info!(hits = summary.hits, stored = summary.stored, "runner.download_all.done");
        Ok(summary)
    }

    /// Fetch, tag and report each URL.
    pub async fn run(&mut self, urls: &[String]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for url in urls {
            let article = self.source.fetch(url).await?;
            let tags = self.extractor.extract(&article.text);
            tracing::debug!(
                %url,
                cache = ?article.cache,
                text_chars = article.text.chars().count(),
                tags = tags.len(),
                "runner.article.tagged"
            );
            self.report.write(url, &tags)?;

            summary.articles += 1;
            if !tags.is_empty() {
                summary.tagged += 1;
            }
        }
        tracing::info!(
            articles = summary.articles,
            tagged = summary.tagged,
            "runner.run.done"
        );
        Ok(summary)
    }

    #[cfg(test)]
    pub fn into_report(self) -> ReportWriter<W> {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogtag_common::{BlogtagError, OutputFormat};
    use blogtag_http::HttpError;
    use blogtag_roster::{PresentationRoster, SpeakerRoster};
    use blogtag_tagger::TagPolicy;
    use blogtag_web::{Article, FetchError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory articles; URLs not listed fail like an unreachable host.
    struct StubSource {
        pages: HashMap<String, String>,
        fetched: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, t)| (u.to_string(), t.to_string()))
                    .collect(),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn missing(url: &str) -> FetchError {
            FetchError::Http {
                url: url.to_string(),
                source: HttpError::Network("connection refused".into()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ArticleSource for StubSource {
        async fn download(&self, url: &str) -> std::result::Result<CacheStatus, FetchError> {
            if self.pages.contains_key(url) {
                Ok(CacheStatus::Hit)
            } else {
                Err(Self::missing(url))
            }
        }

        async fn fetch(&self, url: &str) -> std::result::Result<Article, FetchError> {
            self.fetched.lock().unwrap().push(url.to_string());
            let text = self.pages.get(url).ok_or_else(|| Self::missing(url))?;
            Ok(Article {
                url: url.to_string(),
                text: text.clone(),
                cache: CacheStatus::Hit,
            })
        }
    }

    fn extractor() -> TagExtractor {
        let speakers = SpeakerRoster::from_yaml_str(
            "keynotes:\n  sp1: { id: sp1, name: Name A }\nspeakers:\n  sp2: { id: sp2, name: Name B }\n",
        )
        .unwrap();
        let talks = PresentationRoster::from_yaml_str(
            "kn1:\n  title: Keynote Talk\n  speakers: [{ id: sp1 }]\nsp2:\n  title: Parser Deep Dive\n",
        )
        .unwrap();
        TagExtractor::new(&talks, &speakers, TagPolicy::default()).unwrap()
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn reports_each_url_in_order() {
        let source = StubSource::new(&[
            ("https://b.example/2", "nothing to see"),
            ("https://a.example/1", "a parser deep dive after the keynote talk"),
        ]);
        let ex = extractor();
        let mut runner = Runner::new(&source, &ex, ReportWriter::new(Vec::new(), OutputFormat::Text));

        let summary = runner
            .run(&urls(&["https://a.example/1", "https://b.example/2"]))
            .await
            .unwrap();
        assert_eq!(summary, RunSummary { articles: 2, tagged: 1 });

        let out = String::from_utf8(runner.into_report().into_inner()).unwrap();
        assert_eq!(
            out,
            "URL: https://a.example/1\nTags: Name A, Name B\n-----\n\
             URL: https://b.example/2\nTags: \n-----\n"
        );
    }

    #[tokio::test]
    async fn first_failure_aborts_the_run() {
        let source = StubSource::new(&[
            ("https://ok.example/1", "Keynote Talk"),
            ("https://ok.example/3", "Keynote Talk"),
        ]);
        let ex = extractor();
        let mut runner = Runner::new(&source, &ex, ReportWriter::new(Vec::new(), OutputFormat::Text));

        let err = runner
            .run(&urls(&[
                "https://ok.example/1",
                "https://down.example/2",
                "https://ok.example/3",
            ]))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogtagError::Fetch { .. }));
        assert_eq!(
            *source.fetched.lock().unwrap(),
            ["https://ok.example/1", "https://down.example/2"]
        );

        let out = String::from_utf8(runner.into_report().into_inner()).unwrap();
        assert_eq!(out, "URL: https://ok.example/1\nTags: Name A\n-----\n");
    }

    #[tokio::test]
    async fn download_all_counts_and_stops_on_failure() {
        let source = StubSource::new(&[("https://ok.example/1", "")]);
        let ex = extractor();
        let runner = Runner::new(&source, &ex, ReportWriter::new(Vec::new(), OutputFormat::Json));

        let summary = runner
            .download_all(&urls(&["https://ok.example/1"]))
            .await
            .unwrap();
        assert_eq!(summary, DownloadSummary { hits: 1, stored: 0 });

        assert!(runner
            .download_all(&urls(&["https://ok.example/1", "https://down.example/"]))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn empty_url_list_reports_nothing() {
        let source = StubSource::new(&[]);
        let ex = extractor();
        let mut runner = Runner::new(&source, &ex, ReportWriter::new(Vec::new(), OutputFormat::Text));
        let summary = runner.run(&[]).await.unwrap();
        assert_eq!(summary, RunSummary::default());
        assert!(runner.into_report().into_inner().is_empty());
    }
}
