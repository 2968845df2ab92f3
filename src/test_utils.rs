//! Test utilities
//!
//! A scripted page source that replays canned pages, keeping controller and
//! session tests (and downstream adapter tests) free of any browser
//! dependency.

use anyhow::anyhow;
use async_trait::async_trait;

use crate::domain::page_source::{ExtractionError, ExtractionStep, PageSource, RawRow};

/// A [`PageSource`] that serves a fixed script of pages.
///
/// End of data is reported on the last scripted page. Interaction counters
/// are public so tests can assert how the controller drove the source.
pub struct ScriptedPageSource {
    pages: Vec<Vec<RawRow>>,
    cursor: usize,
    fail_fetch_at: Option<usize>,
    pub page_size_requests: Vec<String>,
    pub filter_submits: u32,
    pub fetches: u32,
    pub advances: u32,
}

impl ScriptedPageSource {
    pub fn new(pages: Vec<Vec<RawRow>>) -> Self {
        Self {
            pages,
            cursor: 0,
            fail_fetch_at: None,
            page_size_requests: Vec::new(),
            filter_submits: 0,
            fetches: 0,
            advances: 0,
        }
    }

    /// A source whose fetch fails once the given 1-based page is reached.
    pub fn failing_at(pages: Vec<Vec<RawRow>>, failing_page: usize) -> Self {
        let mut source = Self::new(pages);
        source.fail_fetch_at = Some(failing_page);
        source
    }

    /// Convenience constructor for a raw row from cell texts.
    pub fn row(cells: &[&str]) -> RawRow {
        RawRow::new(cells.iter().map(|c| (*c).to_owned()).collect())
    }

    fn current_page_number(&self) -> usize {
        self.cursor + 1
    }
}

#[async_trait]
impl PageSource for ScriptedPageSource {
    async fn select_page_size(&mut self, size: &str) -> Result<(), ExtractionError> {
        self.page_size_requests.push(size.to_owned());
        Ok(())
    }

    async fn submit_filter(&mut self) -> Result<(), ExtractionError> {
        self.filter_submits += 1;
        Ok(())
    }

    async fn fetch_current_page(&mut self) -> Result<Vec<RawRow>, ExtractionError> {
        if self.fail_fetch_at == Some(self.current_page_number()) {
            return Err(ExtractionError::new(
                ExtractionStep::FetchPage,
                anyhow!("scripted fetch failure on page {}", self.current_page_number()),
            ));
        }
        self.fetches += 1;
        Ok(self.pages.get(self.cursor).cloned().unwrap_or_default())
    }

    async fn is_end_of_data(&mut self) -> Result<bool, ExtractionError> {
        Ok(self.current_page_number() >= self.pages.len())
    }

    async fn advance_to_next_page(&mut self) -> Result<(), ExtractionError> {
        self.advances += 1;
        self.cursor += 1;
        Ok(())
    }
}
