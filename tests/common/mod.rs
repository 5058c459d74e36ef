#![allow(dead_code)]

use async_trait::async_trait;
use dex_catalog::app::ports::{HttpClientPort, HttpGetResult};
use dex_catalog::error::{CatalogError, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE: &str = "http://dex.test/api/v2";

/// In-memory upstream: serves canned JSON by exact URL and counts requests.
#[derive(Default)]
pub struct FakeHttp {
    routes: Mutex<HashMap<String, (u16, String)>>,
    requests: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: impl Into<String>, body: Value) {
        self.routes.lock().unwrap().insert(url.into(), (200, body.to_string()));
    }

    pub fn route_status(&self, url: impl Into<String>, status: u16) {
        self.routes.lock().unwrap().insert(url.into(), (status, "Not Found".to_string()));
    }

    /// Serve `body` verbatim, for responses that are not valid JSON.
    pub fn route_raw(&self, url: impl Into<String>, status: u16, body: &str) {
        self.routes.lock().unwrap().insert(url.into(), (status, body.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Register a creature and its species under the canonical URLs.
    pub fn add_creature(&self, id: u32, name: &str, types: &[&str], stats: &[u32]) {
        self.route(format!("{}/pokemon/{}/", BASE, id), creature_json(id, name, types, stats));
        self.route(format!("{}/pokemon/{}", BASE, id), creature_json(id, name, types, stats));
        self.route(format!("{}/pokemon/{}", BASE, name), creature_json(id, name, types, stats));
    }
}

#[async_trait]
impl HttpClientPort for FakeHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(url.to_string());
        let routes = self.routes.lock().unwrap();
        match routes.get(url) {
            Some((status, body)) => Ok(HttpGetResult {
                url: url.to_string(),
                status: *status,
                bytes: body.clone().into_bytes(),
            }),
            None => Err(CatalogError::Transport {
                url: url.to_string(),
                message: "connection refused".into(),
            }),
        }
    }
}

pub fn creature_json(id: u32, name: &str, types: &[&str], stats: &[u32]) -> Value {
    let stat_names = ["hp", "attack", "defense", "special-attack", "special-defense", "speed"];
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "stats": stats.iter().zip(stat_names.iter()).map(|(value, stat)| json!({
            "base_stat": value,
            "effort": 0,
            "stat": { "name": stat, "url": format!("{}/stat/{}/", BASE, stat) }
        })).collect::<Vec<_>>(),
        "types": types.iter().enumerate().map(|(i, t)| json!({
            "slot": i + 1,
            "type": { "name": t, "url": format!("{}/type/{}/", BASE, t) }
        })).collect::<Vec<_>>(),
        "sprites": {
            "front_default": format!("http://img.test/{}.png", id),
            "other": { "official-artwork": { "front_default": format!("http://img.test/art/{}.png", id) } }
        },
        "species": { "name": name, "url": format!("{}/pokemon-species/{}/", BASE, id) },
        "cries": { "latest": format!("http://cry.test/{}.ogg", id), "legacy": null }
    })
}

pub fn list_json(count: u64, entries: &[(u32, &str)]) -> Value {
    json!({
        "count": count,
        "next": null,
        "previous": null,
        "results": entries.iter().map(|(id, name)| json!({
            "name": name,
            "url": format!("{}/pokemon/{}/", BASE, id)
        })).collect::<Vec<_>>()
    })
}

pub fn type_json(entries: &[(u32, &str)]) -> Value {
    json!({
        "id": 10,
        "name": "fire",
        "pokemon": entries.iter().map(|(id, name)| json!({
            "slot": 1,
            "pokemon": { "name": name, "url": format!("{}/pokemon/{}/", BASE, id) }
        })).collect::<Vec<_>>()
    })
}

/// Wraps `FakeHttp` with a per-URL latency and tracks how many requests are
/// in flight at once.
#[derive(Default)]
pub struct DelayedHttp {
    pub inner: FakeHttp,
    delays: Mutex<HashMap<String, Duration>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl DelayedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self, url: impl Into<String>, delay: Duration) {
        self.delays.lock().unwrap().insert(url.into(), delay);
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClientPort for DelayedHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let delay = self.delays.lock().unwrap().get(url).copied();
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.get(url).await
    }
}
