use std::future::Future;

use log::{debug, warn};

use crate::error::Result;

use super::types::Page;

/// Position of the next page to request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
}

impl Cursor {
    pub fn first() -> Self {
        Self::default()
    }

    pub fn is_first(self) -> bool {
        self.offset == 0
    }
}

/// Outcome of a `find` walk.
#[derive(Debug, PartialEq, Eq)]
pub enum Search<T> {
    /// First item that satisfied the predicate
    Found(T),
    /// Every page was scanned without a match
    Exhausted { scanned: usize },
}

/// Drives a cursor-paginated listing using only the metadata the server returns.
///
/// Pages are fetched strictly one after another: the decision to request page
/// N+1 depends on the body of page N. Any fetch error aborts the walk and is
/// returned unchanged.
pub struct PageWalker<F> {
    fetch_page: F,
}

impl<T, F, Fut> PageWalker<F>
where
    F: FnMut(Cursor) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    pub fn new(fetch_page: F) -> Self {
        Self { fetch_page }
    }

    /// Returns the first item matching `predicate`, fetching no page past the one holding it.
    pub async fn find<P>(mut self, mut predicate: P) -> Result<Search<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let mut cursor = Cursor::first();
        let mut scanned = 0;

        loop {
            let page = (self.fetch_page)(cursor).await?;
            let next = advance(cursor, &page);
            scanned += page.items.len();

            if let Some(item) = page.items.into_iter().find(|item| predicate(item)) {
                return Ok(Search::Found(item));
            }

            match next {
                Some(next) => cursor = next,
                None => return Ok(Search::Exhausted { scanned }),
            }
        }
    }

    /// Returns every item of every page in server order.
    pub async fn collect(mut self) -> Result<Vec<T>> {
        let mut cursor = Cursor::first();
        let mut items = Vec::new();

        loop {
            let page = (self.fetch_page)(cursor).await?;
            let next = advance(cursor, &page);
            items.extend(page.items);

            match next {
                Some(next) => cursor = next,
                None => return Ok(items),
            }
        }
    }
}

/// Cursor for the page after `page`, or `None` once the listing is exhausted.
///
/// The offset must strictly increase; a page that would not move the cursor
/// forward ends the walk.
fn advance<T>(cursor: Cursor, page: &Page<T>) -> Option<Cursor> {
    let offset = page.next_offset()?;

    if offset <= cursor.offset {
        warn!(
            "Pagination stalled at offset {} (start-index {:?}, {} items); stopping walk",
            cursor.offset,
            page.start_index,
            page.items.len()
        );
        return None;
    }

    debug!(
        "Fetched {} items at offset {}, {} declared in total",
        page.items.len(),
        cursor.offset,
        page.size.unwrap_or_default()
    );

    Some(Cursor { offset })
}
