//! In-process stand-in for the context broker, used by the client tests.

use crate::logic::config::BrokerConfig;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warp::{http::Response, Filter, Rejection};

/// How the fake answers a route
#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Body(String),
    Status(u16),
    /// Hold the request open longer than any client timeout
    Stall(Duration),
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub entity_id: String,
    pub service: Option<String>,
    pub service_path: Option<String>,
    pub body: Option<Value>,
}

pub struct FakeBroker {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

async fn answer(reply: &Reply) -> Response<String> {
    let (status, body) = match reply {
        Reply::Json(value) => (200, value.to_string()),
        Reply::Body(text) => (200, text.clone()),
        Reply::Status(code) => (*code, String::new()),
        Reply::Stall(wait) => {
            tokio::time::sleep(*wait).await;
            (200, "{}".to_string())
        }
    };
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

impl FakeBroker {
    /// Serve `GET /v2/entities/:id` with `entity` and `PATCH /v2/entities/:id/attrs` with `patch`
    pub async fn start(entity: Reply, patch: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        let get_entity = warp::get()
            .and(warp::path!("v2" / "entities" / String))
            .and(warp::header::optional::<String>("fiware-service"))
            .and(warp::header::optional::<String>("fiware-servicepath"))
            .and_then(move |entity_id: String, service: Option<String>, service_path: Option<String>| {
                let log = log.clone();
                let reply = entity.clone();
                async move {
                    log.lock().unwrap().push(Recorded {
                        method: "GET".to_string(),
                        entity_id,
                        service,
                        service_path,
                        body: None,
                    });
                    Ok::<_, Rejection>(answer(&reply).await)
                }
            });

        let log = requests.clone();
        let patch_attrs = warp::patch()
            .and(warp::path!("v2" / "entities" / String / "attrs"))
            .and(warp::header::optional::<String>("fiware-service"))
            .and(warp::header::optional::<String>("fiware-servicepath"))
            .and(warp::body::json::<Value>())
            .and_then(
                move |entity_id: String, service: Option<String>, service_path: Option<String>, body: Value| {
                    let log = log.clone();
                    let reply = patch.clone();
                    async move {
                        log.lock().unwrap().push(Recorded {
                            method: "PATCH".to_string(),
                            entity_id,
                            service,
                            service_path,
                            body: Some(body),
                        });
                        Ok::<_, Rejection>(answer(&reply).await)
                    }
                },
            );

        let (addr, server) =
            warp::serve(get_entity.or(patch_attrs)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        Self { addr, requests }
    }

    /// Client configuration aimed at this fake, with short timeouts
    pub fn config(&self) -> BrokerConfig {
        BrokerConfig {
            base_url: Some(format!("http://{}", self.addr)),
            read_timeout_ms: 300,
            command_timeout_ms: 300,
            ..BrokerConfig::default()
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Configuration pointing at a local port nothing listens on
pub fn closed_port_config() -> BrokerConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    BrokerConfig {
        base_url: Some(format!("http://{}", addr)),
        read_timeout_ms: 300,
        command_timeout_ms: 300,
        ..BrokerConfig::default()
    }
}
