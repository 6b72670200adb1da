/*
 *  peer/mock.rs
 *
 *  vestaglove - controller log display
 *  (c) 2026 vestaglove contributors
 *
 *  Scripted transport for tests and offline runs
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::Instant;

use crate::error::TransportError;
use crate::peer::PeerTransport;

/// One call seen by the mock
#[derive(Debug, Clone)]
pub struct MockCall {
    pub url: String,
    pub timeout: Duration,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct Route {
    body: String,
    /// Remaining successful answers, None = unlimited
    remaining: Option<usize>,
}

/// Internal state for the mock transport (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockTransportState {
    routes: HashMap<String, Route>,
    pub calls: Vec<MockCall>,
}

/// Transport answering from a table of URL -> JSON body.
///
/// Unknown URLs, and routes whose answer budget is used up, fail with
/// `TransportError::Unreachable`. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `body` forever.
    pub fn route(&self, url: impl Into<String>, body: impl Into<String>) -> &Self {
        self.insert(url.into(), body.into(), None)
    }

    /// Answer `url` with `body` for `count` calls, then fail.
    pub fn route_times(&self, url: impl Into<String>, body: impl Into<String>, count: usize) -> &Self {
        self.insert(url.into(), body.into(), Some(count))
    }

    fn insert(&self, url: String, body: String, remaining: Option<usize>) -> &Self {
        if let Ok(mut state) = self.state.lock() {
            state.routes.insert(url, Route { body, remaining });
        }
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Calls made to `url`
    pub fn calls_to(&self, url: &str) -> Vec<MockCall> {
        self.calls().into_iter().filter(|c| c.url == url).collect()
    }
}

impl PeerTransport for MockTransport {
    async fn get<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<T, TransportError> {
        let body = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| TransportError::Unreachable("mock state poisoned".to_string()))?;
            state.calls.push(MockCall { url: url.to_string(), timeout, at: Instant::now() });

            match state.routes.get_mut(url) {
                Some(route) => match route.remaining.as_mut() {
                    Some(0) => None,
                    Some(n) => {
                        *n -= 1;
                        Some(route.body.clone())
                    }
                    None => Some(route.body.clone()),
                },
                None => None,
            }
        };

        match body {
            Some(body) => Ok(serde_json::from_str(&body)?),
            None => Err(TransportError::Unreachable(url.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer::ModeReply;

    #[tokio::test]
    async fn test_route_budget_then_failure() {
        let mock = MockTransport::new();
        mock.route_times("http://a/mode", r#"{"mode":"demo"}"#, 1);

        let first: ModeReply = mock.get("http://a/mode", Duration::from_millis(500)).await.unwrap();
        assert_eq!(first.mode, "demo");
        assert!(mock.get::<ModeReply>("http://a/mode", Duration::from_millis(500)).await.is_err());
        assert!(mock.get::<ModeReply>("http://b/mode", Duration::from_millis(500)).await.is_err());
        assert_eq!(mock.calls().len(), 3);
        assert_eq!(mock.calls_to("http://a/mode").len(), 2);
    }
}
