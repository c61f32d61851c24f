//! Test doubles shared by unit tests

use crate::api::IconFetcher;
use crate::error::{IconError, IconResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Fetcher with scripted responses, per-name call counters and optional gates
/// that hold a fetch open until released.
#[derive(Default)]
pub struct StubFetcher {
    responses: Mutex<HashMap<String, IconResult<String>>>,
    calls: Mutex<HashMap<String, usize>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl StubFetcher {
    pub fn respond(&self, name: &str, response: IconResult<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(name.to_string(), response);
    }

    pub fn gate(&self, name: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(name.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl IconFetcher for StubFetcher {
    fn fetch(&self, name: &str) -> BoxFuture<'static, IconResult<String>> {
        *self.calls.lock().unwrap().entry(name.to_string()).or_default() += 1;
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| {
                Err(IconError::HttpStatus {
                    name: name.to_string(),
                    status: 404,
                })
            });
        let gate = self.gates.lock().unwrap().get(name).cloned();

        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            response
        }
        .boxed()
    }
}

pub fn svg(body: &str) -> String {
    format!("<svg>{}</svg>", body)
}
