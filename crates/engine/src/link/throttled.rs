#![forbid(unsafe_code)]

use crate::domain::{Byterate, Request, RequestId, Tick};
use crate::link::{Payload, RateControl, Socket};
use tracing::{trace, warn};

/// Ticks between issuing a request and the first byte moving.
pub const BASE_DELAY: Tick = 2;

#[derive(Debug, Clone, Copy)]
struct Transfer {
    request: RequestId,
    data: u32,
    remaining: u32,
    eligible_at: Tick,
}

/// Point-to-point link carrying one transfer at a time.
///
/// Per communication phase the active transfer moves
/// `min(base rate, request cap)` bytes; without either limit it completes
/// at once.
#[derive(Debug, Default)]
pub struct ThrottledLink {
    base_rate: Option<Byterate>,
    request_rate: Option<Byterate>,
    transfer: Option<Transfer>,
    delivered: Option<Payload>,
}

impl ThrottledLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_base_rate(&mut self, rate: Option<Byterate>) {
        self.base_rate = rate;
    }

    pub fn base_rate(&self) -> Option<Byterate> {
        self.base_rate
    }

    pub fn is_busy(&self) -> bool {
        self.transfer.is_some()
    }

    /// Move data for the active transfer.
    pub fn communicate(&mut self, tick: Tick) {
        let Some(transfer) = self.transfer.as_mut() else {
            return;
        };
        if tick < transfer.eligible_at {
            return;
        }

        let limit = match (self.base_rate, self.request_rate) {
            (Some(base), Some(cap)) => Some(base.min(cap)),
            (rate, None) | (None, rate) => rate,
        };
        let moved = limit.map_or(transfer.remaining, |rate| rate.min(transfer.remaining));
        transfer.remaining -= moved;

        if transfer.remaining == 0 {
            trace!(tick, data = transfer.data, "transfer complete");
            self.delivered = Some(Payload {
                request: transfer.request,
                data: transfer.data,
            });
            self.transfer = None;
        }
    }
}

impl Socket for ThrottledLink {
    fn request(&mut self, tick: Tick, id: RequestId, request: &Request) {
        if let Some(active) = &self.transfer {
            warn!(
                active = ?active.request,
                requested = ?id,
                "request issued while another transfer is active"
            );
        }
        self.transfer = Some(Transfer {
            request: id,
            data: request.data,
            remaining: request.data,
            eligible_at: tick + BASE_DELAY,
        });
    }

    fn read_if_possible(&mut self) -> Option<Payload> {
        self.delivered.take()
    }
}

impl RateControl for ThrottledLink {
    fn set_request_rate(&mut self, rate: Option<Byterate>) {
        self.request_rate = rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::RequestStore;

    fn one_request(request: Request) -> (RequestId, Request) {
        let mut store = RequestStore::default();
        (store.insert(request), request)
    }

    fn completion_tick(link: &mut ThrottledLink, from: Tick) -> Tick {
        (from..from + 1_000)
            .find(|tick| {
                link.communicate(*tick);
                link.read_if_possible().is_some()
            })
            .unwrap()
    }

    #[test]
    fn waits_base_delay_then_moves_min_rate() {
        let (id, request) = one_request(Request::new(100, 100, 10));
        let mut link = ThrottledLink::new();
        link.set_base_rate(Some(25));
        link.set_request_rate(Some(request.available_byterate));
        link.request(3, id, &request);

        // Eligible at 5, ten ticks of 10 bytes each.
        assert_eq!(completion_tick(&mut link, 3), 14);
        assert!(!link.is_busy());
    }

    #[test]
    fn unlimited_link_completes_once_eligible() {
        let (id, request) = one_request(Request::new(100, 1_000, 10));
        let mut link = ThrottledLink::new();
        link.request(0, id, &request);
        assert_eq!(completion_tick(&mut link, 0), BASE_DELAY);
    }

    #[test]
    fn zero_rate_stalls() {
        let (id, request) = one_request(Request::new(100, 10, 10));
        let mut link = ThrottledLink::new();
        link.set_base_rate(Some(0));
        link.request(0, id, &request);
        for tick in 0..50 {
            link.communicate(tick);
        }
        assert!(link.read_if_possible().is_none());
        assert!(link.is_busy());

        link.set_base_rate(Some(5));
        link.communicate(50);
        link.communicate(51);
        assert_eq!(link.read_if_possible(), Some(Payload { request: id, data: 10 }));
    }
}
