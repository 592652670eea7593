//! A local stand-in for the Cloudflare and Discord APIs that records every
//! request it receives.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Clone)]
struct RecorderState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    deploy_status: StatusCode,
    deploy_body: &'static str,
}

pub struct Recorder {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    /// Deployment requests get `deploy_status`/`deploy_body`, everything
    /// else a 204.
    pub async fn start(deploy_status: StatusCode, deploy_body: &'static str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = RecorderState {
            requests: requests.clone(),
            deploy_status,
            deploy_body,
        };

        let app = Router::new().fallback(record).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn deploys(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.ends_with("/deployments"))
            .collect()
    }

    /// Decoded notification messages, in arrival order.
    pub fn notifications(&self) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with("/api/webhooks/"))
            .map(|r| {
                let body: Value = serde_json::from_slice(&r.body).unwrap();
                let content = body["content"].as_str().unwrap();
                let json = content
                    .strip_prefix("```json\n")
                    .and_then(|c| c.strip_suffix("```"))
                    .unwrap();
                serde_json::from_str(json).unwrap()
            })
            .collect()
    }
}

async fn record(
    State(state): State<RecorderState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let path = uri.path().to_string();
    let is_deploy = path.ends_with("/deployments");

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body,
    });

    if is_deploy {
        (state.deploy_status, state.deploy_body)
    } else {
        (StatusCode::NO_CONTENT, "")
    }
}
