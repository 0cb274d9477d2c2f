//! Cursor-driven page walking for Helix list endpoints.
//!
//! Helix list responses look like
//!
//! ```json
//! { "data": [ ... ], "pagination": { "cursor": "eyJiIjpudWxs..." } }
//! ```
//!
//! The walk asks for `first=<page size>` entries per page and follows
//! `after=<cursor>` until a page comes back short or without a cursor.
//! Either condition ends the walk on its own.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::http_client::{JsonGet, Params};

/// Largest page Helix hands out, and the default page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// One decoded page.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<String>,
}

impl Pagination {
    /// The cursor for the next page, if there is one.
    pub fn next(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Everything a walk collected, plus the error that stopped it early.
#[derive(Debug)]
pub struct PageWalk<T> {
    pub items: Vec<T>,
    /// Number of requests issued, including a failed one.
    pub requests: usize,
    pub error: Option<ApiError>,
}

impl<T> PageWalk<T> {
    /// Drop partial data on failure.
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.items),
        }
    }
}

/// Walks one logical query across all of its pages, sequentially.
pub struct Paginator<'a> {
    http: &'a dyn JsonGet,
    page_size: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(http: &'a dyn JsonGet, page_size: usize) -> Self {
        Self {
            http,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch every page of `endpoint` filtered by `params`.
    ///
    /// Never fails outright: the first failing request ends the walk and is
    /// returned alongside the entries gathered so far.
    pub async fn walk<T: DeserializeOwned>(&self, endpoint: &str, params: &Params) -> PageWalk<T> {
        let mut walk = PageWalk {
            items: Vec::new(),
            requests: 0,
            error: None,
        };
        let mut cursor: Option<String> = None;

        loop {
            let query = self.page_params(params, cursor.as_deref());
            walk.requests += 1;

            let page: Page<T> = match self.fetch_page(endpoint, &query).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(endpoint, page = walk.requests, kept = walk.items.len(), "page fetch failed: {e}");
                    walk.error = Some(e);
                    return walk;
                }
            };

            let received = page.data.len();
            walk.items.extend(page.data);
            debug!(endpoint, page = walk.requests, received, total = walk.items.len(), "page received");

            if received < self.page_size {
                break;
            }
            match page.pagination.next() {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }

        walk
    }

    async fn fetch_page<T: DeserializeOwned>(&self, endpoint: &str, query: &Params) -> Result<Page<T>> {
        let body = self.http.get_json(endpoint, query).await?;
        Ok(serde_json::from_value(body)?)
    }

    fn page_params(&self, params: &Params, cursor: Option<&str>) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(params.len() + 2);
        query.extend(params.iter().filter(|(k, _)| k != "first" && k != "after").cloned());
        query.push(("first".to_string(), self.page_size.to_string()));
        if let Some(cursor) = cursor {
            query.push(("after".to_string(), cursor.to_string()));
        }
        query
    }
}
