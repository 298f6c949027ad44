//! Local mock eBay server for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tokio::net::TcpListener;

/// Canned reply for one request path.
#[derive(Debug, Clone)]
pub struct MockRoute {
    path: String,
    status: u16,
    body: String,
    delay: Duration,
}

impl MockRoute {
    pub fn new(path: &str, status: u16, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Hold each request this long before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request as the mock server received it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    /// Form body decoded into key/value pairs.
    pub fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect()
    }

    /// Query string decoded into key/value pairs.
    pub fn query_pairs(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }
}

pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    peak_in_flight: Arc<AtomicUsize>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Highest number of requests the server was handling at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn single_request(&self) -> CapturedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one request, got {requests:?}");
        requests.into_iter().next().unwrap()
    }
}

/// Start a server that records every request and answers from `routes` by
/// path, 404 otherwise.
pub async fn start_mock_server(routes: Vec<MockRoute>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = requests.clone();
    let routes = Arc::new(routes);
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak_in_flight = Arc::new(AtomicUsize::new(0));
    let peak = peak_in_flight.clone();

    let handle = tokio::spawn(async move {
        let app = axum::Router::new().fallback(move |request: Request<Body>| {
            let captured = captured.clone();
            let routes = routes.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);

                let headers = request
                    .headers()
                    .iter()
                    .map(|(name, value)| {
                        (name.to_string(), value.to_str().unwrap_or("").to_string())
                    })
                    .collect();
                let method = request.method().to_string();
                let path = request.uri().path().to_string();
                let query = request.uri().query().unwrap_or("").to_string();
                let body_bytes = axum::body::to_bytes(request.into_body(), 1024 * 1024)
                    .await
                    .unwrap();
                let body = String::from_utf8_lossy(&body_bytes).to_string();

                let (status, reply, delay) = routes
                    .iter()
                    .find(|route| route.path == path)
                    .map(|route| (route.status, route.body.clone(), route.delay))
                    .unwrap_or((404, String::from(r#"{"error":"not_found"}"#), Duration::ZERO));

                captured.lock().unwrap().push(CapturedRequest {
                    method,
                    path,
                    query,
                    headers,
                    body,
                });

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                in_flight.fetch_sub(1, Ordering::SeqCst);

                (
                    StatusCode::from_u16(status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    reply,
                )
            }
        });
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        url: format!("http://{addr}"),
        requests,
        peak_in_flight,
        _handle: handle,
    }
}

/// Start a server that accepts connections and never answers.
pub async fn start_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{addr}")
}
