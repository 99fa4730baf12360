//! A canned-response HTTP server for adapter tests.

use axum::Router;
use axum::http::{HeaderValue, StatusCode, header::RETRY_AFTER};
use axum::response::{IntoResponse, Response};

/// What the stub answers to every request.
#[derive(Clone, Copy)]
pub struct Canned {
    pub status: u16,
    pub retry_after: Option<&'static str>,
    pub body: &'static str,
}

impl Canned {
    pub fn status(status: u16, body: &'static str) -> Self {
        Self {
            status,
            retry_after: None,
            body,
        }
    }

    pub fn rate_limited(retry_after: &'static str) -> Self {
        Self {
            status: 429,
            retry_after: Some(retry_after),
            body: r#"{"error":{"message":"quota exceeded"}}"#,
        }
    }
}

fn respond(canned: Canned) -> Response {
    let status = StatusCode::from_u16(canned.status).unwrap();
    let mut response = (status, canned.body).into_response();
    if let Some(value) = canned.retry_after {
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from_static(value));
    }
    response
}

/// Serve `canned` on an ephemeral local port and return its base URL.
pub async fn serve(canned: Canned) -> String {
    let app = Router::new().fallback(move || async move { respond(canned) });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
