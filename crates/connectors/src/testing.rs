use crate::remote::{AuthMode, JsonFetcher};
use async_trait::async_trait;
use loopstudio_error::{Result, StudioError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub(crate) struct StubFetcher {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<(Url, AuthMode)>>,
}

impl StubFetcher {
    pub(crate) fn push_ok(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub(crate) fn push_err(&self, err: StudioError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<(Url, AuthMode)> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_urls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|(url, _)| url.to_string())
            .collect()
    }
}

#[async_trait]
impl JsonFetcher for StubFetcher {
    async fn fetch_json(&self, url: &Url, auth: AuthMode) -> Result<Value> {
        self.requests.lock().unwrap().push((url.clone(), auth));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StudioError::debug(format!("no stub response for {}", url))))
    }
}
