//! Hand-off between the decoding thread and frame consumers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::stats::{DecoderStats, StatsSnapshot};
use crate::protocol::Frame;

/// How decoded frames wait for a consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Delivery {
    /// Single slot: a new frame replaces an untaken one.
    #[default]
    Latest,
    /// Bounded FIFO: when full, the oldest pending frame is dropped.
    Queue {
        /// Maximum pending frames (0 behaves as 1)
        depth: usize,
    },
}

impl Delivery {
    fn depth(self) -> usize {
        match self {
            Self::Latest => 1,
            Self::Queue { depth } => depth.max(1),
        }
    }
}

/// Pending frames allocated up front; deeper queues grow on demand.
const INITIAL_CAPACITY: usize = 16;

#[derive(Debug)]
pub(crate) struct PacketSlot {
    pending: Mutex<VecDeque<Frame>>,
    depth: usize,
}

impl PacketSlot {
    pub(crate) fn new(delivery: Delivery) -> Self {
        let depth = delivery.depth();
        Self {
            pending: Mutex::new(VecDeque::with_capacity(depth.min(INITIAL_CAPACITY))),
            depth,
        }
    }

    // Pending frames are whole Copy values even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Frame>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `frame`, returning how many untaken frames it displaced.
    pub(crate) fn publish(&self, frame: Frame) -> u64 {
        let mut pending = self.lock();
        let mut displaced = 0;
        while pending.len() >= self.depth {
            pending.pop_front();
            displaced += 1;
        }
        pending.push_back(frame);
        displaced
    }

    pub(crate) fn take(&self) -> Option<Frame> {
        self.lock().pop_front()
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.lock().is_empty()
    }
}

/// Consumer handle for frames published by a [`StreamDecoder`](super::StreamDecoder).
///
/// Cheap to clone and `Send`, so it can live on a different thread from the
/// decoder.
#[derive(Debug, Clone)]
pub struct PacketReceiver {
    slot: Arc<PacketSlot>,
    stats: Arc<DecoderStats>,
}

impl PacketReceiver {
    pub(crate) fn new(slot: Arc<PacketSlot>, stats: Arc<DecoderStats>) -> Self {
        Self { slot, stats }
    }

    /// Take the next published frame, if any.
    ///
    /// Each published frame is returned at most once across all receivers.
    #[must_use]
    pub fn try_take_packet(&self) -> Option<Frame> {
        self.slot.take()
    }

    /// Check whether a frame is waiting without taking it.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.slot.has_pending()
    }

    /// Counters of the decoder feeding this receiver.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
