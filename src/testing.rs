//! Scripted API doubles shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::http_client::{JsonGet, Params};

type Handler = dyn Fn(&str, &Params) -> Result<Value> + Send + Sync;

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

/// Answers every request with the handler's result and records the call.
pub(crate) struct MockApi {
    handler: Box<Handler>,
    calls: Mutex<Vec<Call>>,
}

impl MockApi {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &Params) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }
}

#[async_trait]
impl JsonGet for MockApi {
    async fn get_json(&self, endpoint: &str, params: &Params) -> Result<Value> {
        self.calls.lock().unwrap().push(Call {
            endpoint: endpoint.to_string(),
            params: params.to_vec(),
        });
        // Let concurrent callers interleave like they would on a real socket.
        tokio::task::yield_now().await;
        (self.handler)(endpoint, params)
    }
}

/// First value of `key` in `params`.
pub(crate) fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Every value of `key` in `params`.
pub(crate) fn params_all<'a>(params: &'a Params, key: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

pub(crate) fn page(data: Vec<Value>, cursor: Option<&str>) -> Value {
    match cursor {
        Some(cursor) => json!({ "data": data, "pagination": { "cursor": cursor } }),
        None => json!({ "data": data, "pagination": {} }),
    }
}

pub(crate) fn stream(login: &str, game_id: &str, viewers: u64, title: &str) -> Value {
    json!({
        "id": format!("s-{login}"),
        "user_id": format!("u-{login}"),
        "user_login": login.to_lowercase(),
        "user_name": login,
        "game_id": game_id,
        "game_name": "",
        "type": "live",
        "title": title,
        "viewer_count": viewers,
        "started_at": "2024-01-01T00:00:00Z",
        "language": "en",
        "thumbnail_url": "",
    })
}

pub(crate) fn game(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "box_art_url": "" })
}

/// Standard `games?id=...` answer: looks each ID up in `known`.
pub(crate) fn games_answer(params: &Params, known: &[(&str, &str)]) -> Value {
    let data = params_all(params, "id")
        .into_iter()
        .filter_map(|id| known.iter().find(|(k, _)| *k == id))
        .map(|(id, name)| game(id, name))
        .collect();
    page(data, None)
}
