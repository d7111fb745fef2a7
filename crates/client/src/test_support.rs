//! Local mock HTTP server for blocking client tests.
//!
//! `wiremock` serves from its own thread, so the blocking clients can talk to
//! it from plain `#[test]` functions. The runtime here only drives setup and
//! request inspection.

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

pub struct TestServer {
    server: MockServer,
    runtime: Runtime,
}

impl TestServer {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn received(&self) -> Vec<Request> {
        self.runtime.block_on(self.server.received_requests()).unwrap_or_default()
    }
}
