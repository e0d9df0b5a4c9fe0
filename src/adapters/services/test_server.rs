//! Canned HTTP upstream for adapter tests

use axum::{extract::RawQuery, http::StatusCode, Router};
use std::sync::{Arc, Mutex};

/// Local server answering every request with the same status and body
pub struct CannedServer {
    pub base_url: String,
    queries: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let queries: Arc<Mutex<Vec<String>>> = Arc::default();
        let recorded = queries.clone();

        let app = Router::new().fallback(move |RawQuery(query): RawQuery| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(query.unwrap_or_default());
                (status, body)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            queries,
        }
    }

    pub fn hits(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    /// Query strings of the requests received so far
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}
