//! Turning ranked search hits into one context block.

use std::sync::Arc;

use tracing::{debug, warn};

use cbam_core::search::{RetrievalResult, SearchService, MAX_CONTEXT_CHARS, NO_SOURCE};

/// Retrieves and sanitizes context for one slow-path turn.
pub struct Retriever {
    service: Arc<dyn SearchService>,
    num_results: usize,
    max_context_chars: usize,
}

impl Retriever {
    pub fn new(service: Arc<dyn SearchService>, num_results: usize) -> Self {
        Self {
            service,
            num_results,
            max_context_chars: MAX_CONTEXT_CHARS,
        }
    }

    /// Override the context length cap (chars).
    pub fn with_max_context_chars(mut self, max: usize) -> Self {
        self.max_context_chars = max;
        self
    }

    /// Retrieve context for a question.
    ///
    /// Hit texts are concatenated in ranked order separated by a blank line,
    /// apostrophes are stripped (legacy sanitation against downstream quoting
    /// issues), and the result is truncated to the first `max_context_chars`
    /// chars. The source is the top-ranked match's file name, "No source"
    /// when nothing matched.
    ///
    /// A failed search call degrades the turn instead of failing it: the
    /// caller gets empty context with the "Error" sentinel source.
    pub async fn retrieve(&self, question: &str) -> RetrievalResult {
        let hits = match self.service.search(question, self.num_results).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "Search failed, continuing without context");
                return RetrievalResult::degraded();
            }
        };

        let source = hits
            .first()
            .map(|h| h.file_name.clone())
            .unwrap_or_else(|| NO_SOURCE.into());

        let joined = hits
            .iter()
            .map(|h| h.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
            .replace('\'', "");

        let context: String = joined.chars().take(self.max_context_chars).collect();

        debug!(
            hits = hits.len(),
            context_chars = context.len(),
            source = %source,
            "context retrieved"
        );

        RetrievalResult { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cbam_core::error::SearchError;
    use cbam_core::search::{SearchHit, ERROR_SOURCE};

    struct FixedSearch {
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl SearchService for FixedSearch {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn search(&self, _q: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
            Ok(self.hits.iter().take(limit).cloned().collect())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl SearchService for FailingSearch {
        fn name(&self) -> &str {
            "failing"
        }

        async fn search(&self, _q: &str, _limit: usize) -> Result<Vec<SearchHit>, SearchError> {
            Err(SearchError::Network("connection refused".into()))
        }
    }

    fn hit(text: &str, file: &str) -> SearchHit {
        SearchHit {
            text: text.into(),
            file_name: file.into(),
        }
    }

    #[tokio::test]
    async fn concatenates_in_ranked_order() {
        let retriever = Retriever::new(
            Arc::new(FixedSearch {
                hits: vec![hit("first passage", "a.pdf"), hit("second passage", "b.pdf")],
            }),
            3,
        );

        let result = retriever.retrieve("question").await;
        assert_eq!(result.context, "first passage\n\nsecond passage");
        assert_eq!(result.source, "a.pdf");
    }

    #[tokio::test]
    async fn strips_apostrophes() {
        let retriever = Retriever::new(
            Arc::new(FixedSearch {
                hits: vec![hit("the EU's mechanism isn't optional", "a.pdf")],
            }),
            3,
        );

        let result = retriever.retrieve("q").await;
        assert_eq!(result.context, "the EUs mechanism isnt optional");
    }

    #[tokio::test]
    async fn truncates_to_cap() {
        let long = "x".repeat(20_000);
        let retriever = Retriever::new(
            Arc::new(FixedSearch {
                hits: vec![hit(&long, "a.pdf")],
            }),
            3,
        )
        .with_max_context_chars(8000);

        let result = retriever.retrieve("q").await;
        assert_eq!(result.context.chars().count(), 8000);
    }

    #[tokio::test]
    async fn zero_hits_yields_no_source_sentinel() {
        let retriever = Retriever::new(Arc::new(FixedSearch { hits: vec![] }), 3);
        let result = retriever.retrieve("q").await;
        assert!(result.context.is_empty());
        assert_eq!(result.source, NO_SOURCE);
    }

    #[tokio::test]
    async fn search_failure_degrades_instead_of_propagating() {
        let retriever = Retriever::new(Arc::new(FailingSearch), 3);
        let result = retriever.retrieve("q").await;
        assert!(result.context.is_empty());
        assert_eq!(result.source, ERROR_SOURCE);
    }

    #[tokio::test]
    async fn respects_num_results() {
        let retriever = Retriever::new(
            Arc::new(FixedSearch {
                hits: vec![hit("a", "a.pdf"), hit("b", "b.pdf"), hit("c", "c.pdf")],
            }),
            2,
        );

        let result = retriever.retrieve("q").await;
        assert_eq!(result.context, "a\n\nb");
    }
}
