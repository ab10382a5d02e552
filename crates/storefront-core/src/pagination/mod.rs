//! Paginated list fetching
//!
//! One generic [`ListController`] drives every paginated feed: the
//! all-products feed, category feeds and search results. It owns a
//! [`Cursor`], an [`Accumulator`] that drops duplicate identities across
//! pages, and a [`RequestCanceller`] that keeps superseded responses from
//! ever touching state. [`FilteredController`] adds the category/query key
//! on top and resets everything when that key changes.

mod accumulator;
mod cancel;
mod controller;
mod cursor;
mod filtered;

pub use accumulator::{merge, Accumulator};
pub use cancel::{RequestCanceller, RequestTicket};
pub use controller::{
    ListController, ListPhase, ListSnapshot, LoadOutcome, Page, PageRequest, PageSource,
    SkipReason,
};
pub use cursor::Cursor;
pub use filtered::{FilterKind, FilteredController};
