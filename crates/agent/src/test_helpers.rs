//! Shared mock services for session tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cbam_core::completion::CompletionService;
use cbam_core::error::{CompletionError, SearchError};
use cbam_core::search::{SearchHit, SearchService};

/// Search service returning a fixed hit list (or a scripted failure).
pub struct MockSearch {
    pub hits: Vec<SearchHit>,
    pub fail: bool,
}

impl MockSearch {
    pub fn with_hits(hits: Vec<(&str, &str)>) -> Arc<Self> {
        Arc::new(Self {
            hits: hits
                .into_iter()
                .map(|(text, file)| SearchHit {
                    text: text.into(),
                    file_name: file.into(),
                })
                .collect(),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            hits: vec![],
            fail: true,
        })
    }
}

#[async_trait]
impl SearchService for MockSearch {
    fn name(&self) -> &str {
        "mock-search"
    }

    async fn search(&self, _q: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        if self.fail {
            return Err(SearchError::Network("mock search down".into()));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

/// Completion service returning scripted results in order.
pub struct MockCompletion {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn answering(answer: &str) -> Arc<Self> {
        Self::scripted(vec![Ok(answer.into())])
    }

    pub fn failing() -> Arc<Self> {
        Self::scripted(vec![])
    }

    pub fn scripted(script: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    async fn complete(&self, _m: &str, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Network("mock completion down".into())))
    }
}
