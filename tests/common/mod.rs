//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tokio::net::TcpListener;

use pddikti_gateway::config::GatewayConfig;
use pddikti_gateway::upstream::{RegistryClient, UpstreamCall, UpstreamError, UpstreamPayload, UpstreamResult};
use pddikti_gateway::{HttpServer, Shutdown};

/// Scripted answer for one call name.
#[derive(Clone)]
pub enum Answer {
    Json(Value),
    Fail(String),
    Slow(Duration, Value),
}

/// `RegistryClient` that answers from a script keyed by call name and
/// records every call it sees. Unscripted calls answer null.
#[derive(Default)]
pub struct ScriptedClient {
    answers: Mutex<HashMap<&'static str, Answer>>,
    calls: Mutex<Vec<UpstreamCall>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, name: &'static str, value: Value) -> Self {
        self.answers.get_mut().unwrap().insert(name, Answer::Json(value));
        self
    }

    pub fn fail(mut self, name: &'static str, message: &str) -> Self {
        self.answers.get_mut().unwrap().insert(name, Answer::Fail(message.to_string()));
        self
    }

    pub fn slow(mut self, name: &'static str, delay: Duration, value: Value) -> Self {
        self.answers.get_mut().unwrap().insert(name, Answer::Slow(delay, value));
        self
    }

    pub fn calls(&self) -> Vec<UpstreamCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl RegistryClient for ScriptedClient {
    fn fetch<'a>(&'a self, call: &'a UpstreamCall) -> BoxFuture<'a, UpstreamResult<UpstreamPayload>> {
        self.calls.lock().unwrap().push(call.clone());
        let answer = self.answers.lock().unwrap().get(call.name()).cloned();
        async move {
            match answer {
                None => Ok(UpstreamPayload::Null),
                Some(Answer::Json(value)) => Ok(UpstreamPayload::from(value)),
                Some(Answer::Fail(message)) => Err(UpstreamError::Other(message)),
                Some(Answer::Slow(delay, value)) => {
                    tokio::time::sleep(delay).await;
                    Ok(UpstreamPayload::from(value))
                }
            }
        }
        .boxed()
    }
}

/// A gateway running on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let res = self.client.get(self.url(path)).send().await.expect("Gateway unreachable");
        let status = res.status().as_u16();
        let body = res.json().await.expect("Body is not JSON");
        (status, body)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway over `client` with default config.
pub async fn spawn_gateway(client: Arc<dyn RegistryClient>) -> TestGateway {
    spawn_gateway_with(GatewayConfig::default(), client).await
}

pub async fn spawn_gateway_with(config: GatewayConfig, client: Arc<dyn RegistryClient>) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_client(config, client);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    TestGateway { addr, client, shutdown }
}

/// Serve `router` on an ephemeral port, standing in for the registry.
pub async fn start_mock_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}
