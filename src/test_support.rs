//! Test doubles for the gateway seams.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;

use crate::gateway::{ApiClient, ApiRequest, ApiResponse, Navigator, Transport, TransportError};
use crate::routes::AppRoute;
use crate::session::{MemoryStorage, SessionStore};

/// Replays queued replies in order and records every request it was given.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<Result<ApiResponse, TransportError>>>>,
    pub sent: Rc<RefCell<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn reply(&self, status: u16, body: &str) {
        self.replies
            .borrow_mut()
            .push_back(Ok(ApiResponse { status, body: body.to_owned() }));
    }

    pub fn fail(&self, message: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError(message.to_owned())));
    }

    pub fn last_sent(&self) -> ApiRequest {
        self.sent.borrow().last().cloned().expect("no request was sent")
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted reply".to_owned())))
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingNavigator {
    pub visits: Rc<RefCell<Vec<AppRoute>>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &AppRoute) {
        self.visits.borrow_mut().push(route.clone());
    }
}

pub(crate) type TestClient = ApiClient<ScriptedTransport, MemoryStorage, RecordingNavigator>;

/// Anonymous client over fresh storage.
pub(crate) fn anonymous_client() -> (TestClient, ScriptedTransport) {
    let transport = ScriptedTransport::default();
    let store = SessionStore::new(MemoryStorage::new());
    let client = ApiClient::new("http://localhost:3000", transport.clone(), store, RecordingNavigator::default());
    (client, transport)
}
