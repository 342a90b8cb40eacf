//! Offset pagination as a pure state machine.
//!
//! [`PageCursor`] decides which page to request next and when to stop; it
//! performs no I/O, so every stop condition is testable without a provider.
//!
//! Stop conditions, first match wins:
//! 1. the accumulated count reached the target;
//! 2. two pages in a row came back empty (one empty page is tolerated);
//! 3. all `ceil(target / page_size)` pages were requested.

/// Largest page SerpAPI returns for the organic and news engines.
pub const PAGE_SIZE: usize = 10;

/// Empty pages in a row that end pagination.
pub const MAX_CONSECUTIVE_EMPTY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    ConsecutiveEmptyPages,
    PagesExhausted,
    /// The provider cannot serve this source at all (e.g. no credentials).
    ProviderUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// Request page `page` (0-based), starting at result `offset` (0-based).
    Fetch {
        page: usize,
        offset: usize,
        count: usize,
    },
    Done(StopReason),
}

#[derive(Debug, Clone)]
pub struct PageCursor {
    target: usize,
    page_size: usize,
    pages_needed: usize,
    next_page: usize,
    consecutive_empty: usize,
    accumulated: usize,
    aborted: Option<StopReason>,
}

impl PageCursor {
    #[must_use]
    pub fn new(target: usize) -> Self {
        Self::with_page_size(target, PAGE_SIZE)
    }

    /// A zero `page_size` is treated as 1.
    #[must_use]
    pub fn with_page_size(target: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            target,
            page_size,
            pages_needed: target.div_ceil(page_size),
            next_page: 0,
            consecutive_empty: 0,
            accumulated: 0,
            aborted: None,
        }
    }

    #[must_use]
    pub fn pages_needed(&self) -> usize {
        self.pages_needed
    }

    #[must_use]
    pub fn accumulated(&self) -> usize {
        self.accumulated
    }

    #[must_use]
    pub fn next_step(&self) -> PageStep {
        if let Some(reason) = self.aborted {
            return PageStep::Done(reason);
        }
        if self.accumulated >= self.target {
            return PageStep::Done(StopReason::TargetReached);
        }
        if self.consecutive_empty >= MAX_CONSECUTIVE_EMPTY {
            return PageStep::Done(StopReason::ConsecutiveEmptyPages);
        }
        if self.next_page >= self.pages_needed {
            return PageStep::Done(StopReason::PagesExhausted);
        }
        PageStep::Fetch {
            page: self.next_page,
            offset: self.next_page * self.page_size,
            count: self.page_size,
        }
    }

    /// Records the outcome of the page last returned by [`Self::next_step`].
    /// A failed call is recorded as zero items.
    pub fn record(&mut self, items: usize) {
        self.next_page += 1;
        self.accumulated += items;
        if items == 0 {
            self.consecutive_empty += 1;
        } else {
            self.consecutive_empty = 0;
        }
    }

    pub fn abort(&mut self, reason: StopReason) {
        self.aborted = Some(reason);
    }
}
