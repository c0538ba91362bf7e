use std::collections::VecDeque;

use ckb_types::{packed::OutPoint, prelude::*};

use crate::constants::MAX_QUEUE_CAPACITY;
use crate::error::{Error, Result};

/// OutPoints recently handed out by the collector, oldest first.
///
/// Entries are the 0x hex of the serialized OutPoint. Once the queue is full the
/// oldest entry is dropped for every new one.
#[derive(Debug, Clone)]
pub struct PendingQueue {
    entries:  VecDeque<String>,
    capacity: usize,
}

impl Default for PendingQueue {
    fn default() -> Self {
        PendingQueue::with_capacity(MAX_QUEUE_CAPACITY)
    }
}

impl PendingQueue {
    pub fn new() -> Self {
        PendingQueue::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PendingQueue {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, out_point: &OutPoint) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(serialize_out_point(out_point));
    }

    pub fn extend<'a, I: IntoIterator<Item = &'a OutPoint>>(&mut self, out_points: I) {
        for out_point in out_points {
            self.push(out_point);
        }
    }

    pub fn contains(&self, out_point: &OutPoint) -> bool {
        let serialized = serialize_out_point(out_point);
        self.entries.iter().any(|entry| *entry == serialized)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }
}

pub fn serialize_out_point(out_point: &OutPoint) -> String {
    share::bytes_to_hex(out_point.as_slice())
}

pub fn deserialize_out_point(hex: &str) -> Result<OutPoint> {
    let bytes = share::hex_to_bytes(hex)?;
    OutPoint::from_slice(&bytes).map_err(|err| Error::MalformedArgs(err.to_string()))
}

pub fn deserialize_out_points<S: AsRef<str>>(hex_list: &[S]) -> Result<Vec<OutPoint>> {
    hex_list
        .iter()
        .map(|hex| deserialize_out_point(hex.as_ref()))
        .collect()
}
