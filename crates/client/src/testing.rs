//! In-crate fakes for the transport and cache storage seams.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use storefront_core::{CacheDb, CacheStorage, CachedResponse, Error, RequestKey};
use tokio::sync::Notify;

use crate::fetch::{ProxyRequest, ProxyResponse, Transport};

pub const ORIGIN: &str = "http://localhost:3000";

pub fn url(path: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

#[derive(Clone)]
enum Scripted {
    Respond { status: u16, content_type: &'static str, body: Vec<u8> },
    Fail(String),
}

/// Transport answering from a per-URL script and counting calls.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<ProxyRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.respond_typed(url, status, "text/plain", body);
    }

    pub fn respond_typed(&self, url: &str, status: u16, content_type: &'static str, body: &str) {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Scripted::Respond { status, content_type, body: body.as_bytes().to_vec() },
        );
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Scripted::Fail(message.to_string()));
    }

    /// Serve 200 for every path of the default manifest.
    pub fn serve_manifest(&self) {
        for path in ["/", "/manifest.json", "/favicon.png", "/logo.png"] {
            self.respond(url(path).as_str(), 200, &format!("asset {path}"));
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.as_str() == url)
            .count()
    }

    pub fn last_request(&self) -> Option<ProxyRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse, Error> {
        self.calls.lock().unwrap().push(request.clone());
        let scripted = self.routes.lock().unwrap().get(request.url.as_str()).cloned();

        match scripted {
            Some(Scripted::Respond { status, content_type, body }) => {
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                Ok(ProxyResponse::new(request.url.clone(), StatusCode::from_u16(status).unwrap(), headers, body))
            }
            Some(Scripted::Fail(message)) => Err(Error::Network(message)),
            None => Err(Error::Network(format!("no route for {}", request.url))),
        }
    }
}

/// SQLite storage wrapper that counts traffic and injects failures.
pub struct FlakyStorage {
    pub db: CacheDb,
    gets: AtomicUsize,
    puts: AtomicUsize,
    failing_deletes: Mutex<HashSet<String>>,
    fail_list: Mutex<bool>,
    fail_puts: Mutex<bool>,
    put_gate: Mutex<Option<Arc<Notify>>>,
}

impl FlakyStorage {
    pub async fn new() -> Arc<Self> {
        Arc::new(Self {
            db: CacheDb::open_in_memory().await.unwrap(),
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            failing_deletes: Mutex::new(HashSet::new()),
            fail_list: Mutex::new(false),
            fail_puts: Mutex::new(false),
            put_gate: Mutex::new(None),
        })
    }

    pub fn fail_delete_of(&self, name: &str) {
        self.failing_deletes.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_list(&self) {
        *self.fail_list.lock().unwrap() = true;
    }

    pub fn fail_puts(&self) {
        *self.fail_puts.lock().unwrap() = true;
    }

    /// Hold every single-entry put until the returned gate is notified.
    pub fn gate_puts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.put_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn open(&self, name: &str) -> Result<bool, Error> {
        self.db.open_store(name).await
    }

    async fn list_names(&self) -> Result<Vec<String>, Error> {
        if *self.fail_list.lock().unwrap() {
            return Err(Error::InvalidState("store index unavailable".into()));
        }
        self.db.list_store_names().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        if self.failing_deletes.lock().unwrap().contains(name) {
            return Err(Error::InvalidState(format!("store {name} is locked")));
        }
        self.db.delete_store(name).await
    }

    async fn get(&self, store: &str, key: &RequestKey) -> Result<Option<CachedResponse>, Error> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.db.get_entry(store, key).await
    }

    async fn put(&self, store: &str, key: &RequestKey, response: &CachedResponse) -> Result<(), Error> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let gate = self.put_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if *self.fail_puts.lock().unwrap() {
            return Err(Error::CacheWrite("disk full".into()));
        }
        self.db.put_entry(store, key, response).await
    }

    async fn put_all(&self, store: &str, entries: Vec<(RequestKey, CachedResponse)>) -> Result<(), Error> {
        if *self.fail_puts.lock().unwrap() {
            return Err(Error::CacheWrite("disk full".into()));
        }
        self.db.put_entries(store, entries).await
    }
}
