#![forbid(unsafe_code)]

use crate::domain::{Byterate, Tick};
use slotmap::new_key_type;

new_key_type! {
    /// Identity of a request. Keys are handed out in insertion order and
    /// never reused, so ordering by id is ordering by insertion.
    pub struct RequestId;
}

/// Data that must be in the cache by `deadline`.
///
/// Two requests with equal fields are still distinct; identity is carried by
/// the [`RequestId`] under which they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub deadline: Tick,
    /// Size in bytes.
    pub data: u32,
    /// Byterate the server grants this request.
    pub available_byterate: Byterate,
}

impl Request {
    pub fn new(deadline: Tick, data: u32, available_byterate: Byterate) -> Self {
        Self {
            deadline,
            data,
            available_byterate,
        }
    }
}
