#![forbid(unsafe_code)]

use crate::domain::{Request, RequestId};
use slotmap::SlotMap;

/// Owns every request of a run. Requests are never removed.
#[derive(Debug, Default)]
pub struct RequestStore {
    requests: SlotMap<RequestId, Request>,
}

impl RequestStore {
    pub fn insert(&mut self, request: Request) -> RequestId {
        self.requests.insert(request)
    }

    pub fn get(&self, id: RequestId) -> Option<&Request> {
        self.requests.get(id)
    }

    /// Requests in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RequestId, &Request)> {
        self.requests.iter()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl FromIterator<Request> for RequestStore {
    fn from_iter<I: IntoIterator<Item = Request>>(iter: I) -> Self {
        let mut store = Self::default();
        for request in iter {
            store.insert(request);
        }
        store
    }
}
