//! Streaming frame decoder
//!
//! [`StreamDecoder`] rebuilds frames from a byte stream with no message
//! boundaries, one byte per call. Bad frames are dropped and the decoder
//! hunts for the next sync pair; nothing is reported to the caller apart
//! from the [`DecoderStats`] counters and `tracing` events.
//!
//! ```rust
//! use fclink::{Frame, StreamDecoder};
//!
//! let wire = Frame::with_payload(0x01, &[])?.wire_bytes()?;
//!
//! let mut decoder = StreamDecoder::new();
//! decoder.feed_slice(&wire);
//!
//! let frame = decoder.try_take_packet().expect("frame published");
//! assert_eq!(frame.frame_type(), 0x01);
//! # Ok::<(), fclink::Error>(())
//! ```

mod slot;
mod stats;

use std::io::{self, ErrorKind, Read};
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use self::slot::PacketSlot;
use self::stats::Rejection;
use crate::protocol::{CHECKSUM_SEED, ChecksumEngine, Crc8, Error, Frame, Result, SYNC1, SYNC2};

pub use self::slot::{Delivery, PacketReceiver};
pub use self::stats::{DecoderStats, StatsSnapshot};

/// Position of the decoder within the current frame attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeState {
    /// Hunting for the first sync byte
    #[default]
    Unsynced,
    /// First sync byte seen
    GotSync1,
    /// Sync pair seen, length byte next
    GotSync2,
    /// Length accepted, type byte next
    GotLength,
    /// Receiving payload bytes
    GotType,
    /// Payload complete, checksum byte next
    GotData,
}

/// Decoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Checksum seed, must match the sender's
    pub seed: u8,
    /// How decoded frames are handed to consumers
    pub delivery: Delivery,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            seed: CHECKSUM_SEED,
            delivery: Delivery::Latest,
        }
    }
}

/// Byte-at-a-time frame decoder for one link
///
/// Owns its working frame exclusively. Completed frames are copied into a
/// shared slot that consumers drain through [`try_take_packet`] or a
/// [`PacketReceiver`].
///
/// [`try_take_packet`]: StreamDecoder::try_take_packet
#[derive(Debug)]
pub struct StreamDecoder<E = Crc8> {
    config: DecoderConfig,
    engine: E,
    state: DecodeState,
    working: Frame,
    /// Bytes received after the length field in the current attempt.
    received: usize,
    slot: Arc<PacketSlot>,
    stats: Arc<DecoderStats>,
}

impl StreamDecoder<Crc8> {
    /// Create a decoder with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a decoder with the default checksum engine
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self::with_engine(config, Crc8)
    }
}

impl Default for StreamDecoder<Crc8> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ChecksumEngine> StreamDecoder<E> {
    /// Create a decoder using a custom checksum engine
    #[must_use]
    pub fn with_engine(config: DecoderConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            state: DecodeState::Unsynced,
            working: Frame::new(),
            received: 0,
            slot: Arc::new(PacketSlot::new(config.delivery)),
            stats: Arc::new(DecoderStats::default()),
        }
    }

    /// Consume one byte from the link
    ///
    /// Never fails: malformed frames are counted and dropped, and the
    /// decoder goes back to hunting for a sync pair.
    pub fn feed(&mut self, byte: u8) -> DecodeState {
        self.state = match self.state {
            DecodeState::Unsynced => {
                if byte == SYNC1 {
                    DecodeState::GotSync1
                } else {
                    self.stats.record_noise();
                    DecodeState::Unsynced
                }
            }
            DecodeState::GotSync1 => {
                if byte == SYNC2 {
                    DecodeState::GotSync2
                } else {
                    trace!(byte, "sync pair broken");
                    self.reject(Rejection::BrokenSync)
                }
            }
            DecodeState::GotSync2 => self.on_length(byte),
            DecodeState::GotLength => {
                self.working.set_type(byte);
                self.received = 1;
                self.payload_state()
            }
            DecodeState::GotType => self.on_payload(byte),
            DecodeState::GotData => self.on_checksum(byte),
        };
        self.state
    }

    fn on_length(&mut self, byte: u8) -> DecodeState {
        match self.working.set_length(byte) {
            Ok(()) => {
                self.received = 0;
                DecodeState::GotLength
            }
            Err(err) => {
                debug!(length = byte, %err, "rejecting frame length");
                let rejection = match err {
                    Error::MalformedLength { .. } => Rejection::MalformedLength,
                    _ => Rejection::BufferOverflow,
                };
                self.reject(rejection)
            }
        }
    }

    fn on_payload(&mut self, byte: u8) -> DecodeState {
        if let Err(err) = self.working.write_byte(byte, self.received - 1) {
            debug!(received = self.received, %err, "payload overran buffer");
            return self.reject(Rejection::BufferOverflow);
        }
        self.received += 1;
        self.payload_state()
    }

    /// `GotData` once the declared payload is in, `GotType` otherwise.
    fn payload_state(&self) -> DecodeState {
        if self.received == usize::from(self.working.length()) - 1 {
            DecodeState::GotData
        } else {
            DecodeState::GotType
        }
    }

    fn on_checksum(&mut self, byte: u8) -> DecodeState {
        self.working.set_checksum(byte);
        self.received += 1;

        let expected = match self
            .working
            .compute_checksum_with(&self.engine, self.config.seed)
        {
            Ok(expected) => expected,
            Err(err) => {
                debug!(%err, "frame length invalid at checksum");
                return self.reject(Rejection::MalformedLength);
            }
        };

        if expected != byte {
            debug!(
                expected,
                found = byte,
                frame_type = self.working.frame_type(),
                length = self.working.length(),
                "checksum mismatch"
            );
            return self.reject(Rejection::ChecksumMismatch);
        }

        self.publish();
        self.received = 0;
        DecodeState::Unsynced
    }

    fn publish(&mut self) {
        let displaced = self.slot.publish(self.working.copy());
        self.stats.record_frame();
        if displaced > 0 {
            self.stats.record_overwrite(displaced);
            debug!(displaced, "untaken frame overwritten");
        }
        trace!(
            frame_type = self.working.frame_type(),
            length = self.working.length(),
            "frame decoded"
        );
    }

    fn reject(&mut self, rejection: Rejection) -> DecodeState {
        self.stats.record_rejection(rejection);
        self.received = 0;
        DecodeState::Unsynced
    }

    /// Feed a chunk of bytes, returning the state after the last one
    #[instrument(level = "trace", skip(self, bytes), fields(len = bytes.len()))]
    pub fn feed_slice(&mut self, bytes: &[u8]) -> DecodeState {
        for &byte in bytes {
            self.feed(byte);
        }
        self.state
    }

    /// Read one chunk from `reader` into `scratch` and feed it
    ///
    /// Returns the number of bytes fed; `0` means the reader hit end of
    /// stream. Interrupted reads are retried. An empty `scratch` is rejected
    /// with [`ErrorKind::InvalidInput`], since every read into it would
    /// return `0`.
    #[instrument(level = "trace", skip_all)]
    pub fn feed_from<R: Read>(&mut self, reader: &mut R, scratch: &mut [u8]) -> Result<usize> {
        if scratch.is_empty() {
            return Err(io::Error::new(ErrorKind::InvalidInput, "empty scratch buffer").into());
        }
        let read = loop {
            match reader.read(scratch) {
                Ok(read) => break read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        self.feed_slice(&scratch[..read]);
        Ok(read)
    }

    /// Take the most recently published frame, if one is pending
    #[must_use]
    pub fn try_take_packet(&self) -> Option<Frame> {
        self.slot.take()
    }

    /// Handle for taking frames from another thread
    #[must_use]
    pub fn receiver(&self) -> PacketReceiver {
        PacketReceiver::new(Arc::clone(&self.slot), Arc::clone(&self.stats))
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> DecodeState {
        self.state
    }

    /// Abandon any partial frame and hunt for a new sync pair
    ///
    /// Frames already published stay available.
    pub fn reset(&mut self) {
        self.state = DecodeState::Unsynced;
        self.received = 0;
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Current counter values
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
