use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{Accumulator, Cursor, RequestCanceller, RequestTicket};
use crate::error::ErrorInfo;
use crate::models::Identified;
use crate::Result;

/// Offset/limit pair sent with a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

/// One batch of items as returned by a [`PageSource`]
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Server-reported total, `None` when absent or zero
    pub total: Option<u32>,
}

/// Where pages come from
///
/// The filter is the active category or search query, `None` for the
/// unfiltered feed. Implementations build the endpoint from it.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, filter: Option<&str>, request: PageRequest) -> Result<Page<T>>;
}

/// Why `load_next` didn't issue a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A page request is already out
    InFlight,
    /// The last page has been seen
    Exhausted,
    /// A filtered feed has no key to filter by
    NoFilter,
    /// The key asked for is already the active one
    Unchanged,
}

/// Result of a `load_next` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { added: usize, has_more: bool },
    Skipped(SkipReason),
    Failed(ErrorInfo),
    /// The request was superseded before it could be applied
    Cancelled,
}

/// Coarse state of a list, what a view would switch its layout on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    LoadingFirstPage,
    LoadingNextPage,
    Ready { has_more: bool },
    Error,
}

/// Point-in-time copy of a controller's state
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
    pub has_more: bool,
    pub offset: u32,
    pub total: Option<u32>,
    pub filter_key: Option<String>,
    pub phase: ListPhase,
}

struct ListState<T: Identified> {
    accumulator: Accumulator<T>,
    cursor: Cursor,
    loading: bool,
    error: Option<ErrorInfo>,
    total: Option<u32>,
    filter_key: Option<String>,
    canceller: RequestCanceller,
}

impl<T: Identified> ListState<T> {
    fn reset(&mut self) {
        if self.canceller.cancel() {
            debug!("Cancelled in-flight request on reset");
        }
        self.accumulator.clear();
        self.cursor.reset();
        self.loading = false;
        self.error = None;
        self.total = None;
    }

    fn phase(&self) -> ListPhase {
        if self.loading {
            if self.cursor.offset() == 0 {
                ListPhase::LoadingFirstPage
            } else {
                ListPhase::LoadingNextPage
            }
        } else if self.error.is_some() {
            ListPhase::Error
        } else if self.cursor.offset() == 0 && !self.cursor.is_exhausted() {
            ListPhase::Idle
        } else {
            ListPhase::Ready {
                has_more: !self.cursor.is_exhausted(),
            }
        }
    }
}

/// Clears the in-flight marker if a `load_next` future is dropped before
/// its response is applied
struct InFlight<'a, T: Identified> {
    state: &'a Mutex<ListState<T>>,
    generation: u64,
    label: &'a str,
    armed: bool,
}

impl<T: Identified> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        if state.canceller.release(self.generation) {
            debug!("{}: page request dropped before completion", self.label);
            state.loading = false;
        }
    }
}

/// Paginated list over any [`PageSource`]
///
/// Page requests are strictly sequential: `load_next` is a no-op while one
/// is outstanding or after the last page. State sits behind a mutex that is
/// never held across an `.await`, so a `reset` (or a key change through
/// [`FilteredController`](super::FilteredController)) can land while a
/// request is in flight. That request is aborted and its response, if it
/// still arrives, is thrown away.
pub struct ListController<T: Identified> {
    source: Arc<dyn PageSource<T>>,
    label: String,
    state: Mutex<ListState<T>>,
}

impl<T: Identified + Clone + Send> ListController<T> {
    pub fn new(source: Arc<dyn PageSource<T>>, page_size: u32) -> Self {
        Self {
            source,
            label: "list".to_string(),
            state: Mutex::new(ListState {
                accumulator: Accumulator::new(),
                cursor: Cursor::new(page_size),
                loading: false,
                error: None,
                total: None,
                filter_key: None,
                canceller: RequestCanceller::new(),
            }),
        }
    }

    /// Name used in log lines
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fetch the next page and fold it into the list
    pub async fn load_next(&self) -> LoadOutcome {
        let (mut ticket, request, filter) = {
            let mut state = self.state.lock();
            if state.loading {
                debug!("{}: page request already in flight, skipping", self.label);
                return LoadOutcome::Skipped(SkipReason::InFlight);
            }
            if state.cursor.is_exhausted() {
                debug!("{}: no more pages", self.label);
                return LoadOutcome::Skipped(SkipReason::Exhausted);
            }

            state.loading = true;
            state.error = None;
            let request = PageRequest {
                offset: state.cursor.offset(),
                limit: state.cursor.page_size(),
            };
            (state.canceller.issue(), request, state.filter_key.clone())
        };

        debug!(
            "{}: fetching page {}, skip: {}",
            self.label,
            request.offset / request.limit,
            request.offset
        );

        let mut guard = InFlight {
            state: &self.state,
            generation: ticket.generation(),
            label: &self.label,
            armed: true,
        };

        let result = tokio::select! {
            biased;
            _ = ticket.aborted() => {
                debug!("{}: request for skip {} cancelled", self.label, request.offset);
                return LoadOutcome::Cancelled;
            }
            result = self.source.fetch_page(filter.as_deref(), request) => result,
        };

        guard.armed = false;
        self.apply(&ticket, result)
    }

    fn apply(&self, ticket: &RequestTicket, result: Result<Page<T>>) -> LoadOutcome {
        let mut state = self.state.lock();
        if !state.canceller.finish(ticket) {
            debug!("{}: discarding stale response", self.label);
            return LoadOutcome::Cancelled;
        }
        state.loading = false;

        match result {
            Ok(page) => {
                let returned = page.items.len();
                let added = state.accumulator.extend(page.items);
                state.cursor.advance(returned);
                if let Some(total) = page.total.filter(|t| *t > 0) {
                    state.total = Some(total);
                }

                let has_more = !state.cursor.is_exhausted();
                info!(
                    "{}: got {} items ({} new), {} total, has more: {}",
                    self.label,
                    returned,
                    added,
                    state.accumulator.len(),
                    has_more
                );
                LoadOutcome::Loaded { added, has_more }
            }
            Err(e) if e.is_cancelled() => LoadOutcome::Cancelled,
            Err(e) => {
                warn!("{}: page request failed: {}", self.label, e);
                let info = e.info();
                state.error = Some(info.clone());
                LoadOutcome::Failed(info)
            }
        }
    }

    /// Drop everything and go back to idle, aborting any request in flight
    pub fn reset(&self) {
        self.state.lock().reset();
    }

    /// Reset and fetch the first page again
    pub async fn refresh(&self) -> LoadOutcome {
        self.reset();
        self.load_next().await
    }

    /// Reset and switch to a different filter key in one step
    pub(crate) fn replace_filter(&self, key: Option<String>) {
        let mut state = self.state.lock();
        state.reset();
        state.filter_key = key;
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.state.lock();
        ListSnapshot {
            items: state.accumulator.items().to_vec(),
            loading: state.loading,
            error: state.error.clone(),
            has_more: !state.cursor.is_exhausted(),
            offset: state.cursor.offset(),
            total: state.total,
            filter_key: state.filter_key.clone(),
            phase: state.phase(),
        }
    }

    pub fn items(&self) -> Vec<T> {
        self.state.lock().accumulator.items().to_vec()
    }

    pub fn len(&self) -> usize {
        self.state.lock().accumulator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().accumulator.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn has_more(&self) -> bool {
        !self.state.lock().cursor.is_exhausted()
    }

    pub fn error(&self) -> Option<ErrorInfo> {
        self.state.lock().error.clone()
    }

    pub fn filter_key(&self) -> Option<String> {
        self.state.lock().filter_key.clone()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.lock().cursor
    }

    pub fn phase(&self) -> ListPhase {
        self.state.lock().phase()
    }
}
