//! Cursor-based pagination with the Stream API.
//!
//! [`CursorPager`] turns a page-fetching function into a lazy stream of
//! items. Pages are fetched one at a time, only when the consumer has drained
//! the previous page, and traversal ends when the server reports no next
//! cursor.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures_util::StreamExt;
//! use hostkit_client::pager::{CursorPager, PageRequest};
//!
//! let mut items = Box::pin(CursorPager::new(vec![], |req: PageRequest| async move {
//!     client.list_page::<Property>("/properties", req.query_pairs()).await
//! }));
//!
//! while let Some(result) = items.next().await {
//!     let property = result?;
//!     println!("{}", property.name);
//! }
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::TryStreamExt;
use pin_project_lite::pin_project;

use crate::types::Page;

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Arguments for one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Fixed query parameters, identical for every page.
    pub params: Vec<(String, String)>,
    /// `None` for the first page.
    pub cursor: Option<String>,
    pub page_size: u32,
}

impl PageRequest {
    /// First page for `params` at the default page size.
    pub fn first(params: Vec<(String, String)>) -> Self {
        Self {
            params,
            cursor: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Continue from a cursor returned in `meta.nextCursor`.
    pub fn with_cursor(mut self, cursor: Option<&str>) -> Self {
        self.cursor = cursor.map(str::to_string);
        self
    }

    /// Fixed params merged with `cursor` (when present) and `pageSize`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.params.clone();
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor".to_string(), cursor.clone()));
        }
        pairs.push(("pageSize".to_string(), self.page_size.to_string()));
        pairs
    }
}

pin_project! {
    /// A cursor-based pager that implements `Stream` for paginated items.
    ///
    /// A fetch failure is yielded as an `Err` after every item of the earlier
    /// pages, and ends the stream.
    ///
    /// # Type Parameters
    ///
    /// * `T` - The item type
    /// * `E` - The error type
    /// * `F` - The fetcher function type
    /// * `Fut` - The future returned by the fetcher
    pub struct CursorPager<T, E, F, Fut>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<Page<T>, E>>,
    {
        params: Vec<(String, String)>,
        page_size: u32,
        next_cursor: Option<String>,
        buffer: VecDeque<T>,
        done: bool,
        fetcher: F,
        #[pin]
        current_fetch: Option<Fut>,
    }
}

impl<T, E, F, Fut> CursorPager<T, E, F, Fut>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    /// Create a pager over `fetcher` with fixed query `params`.
    ///
    /// Nothing is fetched until the stream is first polled.
    pub fn new(params: Vec<(String, String)>, fetcher: F) -> Self {
        Self {
            params,
            page_size: DEFAULT_PAGE_SIZE,
            next_cursor: None,
            buffer: VecDeque::new(),
            done: false,
            fetcher,
            current_fetch: None,
        }
    }

    /// Set the page size sent with every fetch.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

impl<T, E, F, Fut> Stream for CursorPager<T, E, F, Fut>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if *this.done {
                return Poll::Ready(None);
            }

            if let Some(fut) = this.current_fetch.as_mut().as_pin_mut() {
                match fut.poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.current_fetch.set(None);

                        *this.next_cursor = page.meta.next_cursor;
                        if this.next_cursor.is_none() {
                            *this.done = true;
                        }

                        this.buffer.extend(page.data);
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.current_fetch.set(None);
                        *this.done = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            let request = PageRequest {
                params: this.params.clone(),
                cursor: this.next_cursor.clone(),
                page_size: *this.page_size,
            };
            let fut = (this.fetcher)(request);
            this.current_fetch.set(Some(fut));
        }
    }
}

/// Build a pager; shorthand for [`CursorPager::new`] plus a page size.
pub fn paginate<T, E, F, Fut>(
    fetcher: F,
    params: Vec<(String, String)>,
    page_size: u32,
) -> CursorPager<T, E, F, Fut>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    CursorPager::new(params, fetcher).with_page_size(page_size)
}

/// Drive a paginated stream to completion.
///
/// Any failure fails the whole call; no partial list is returned.
pub async fn collect_all<S, T, E>(stream: S) -> Result<Vec<T>, E>
where
    S: Stream<Item = Result<T, E>>,
{
    stream.try_collect().await
}
