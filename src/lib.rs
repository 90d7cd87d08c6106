//! fclink - framed serial link between a ground application and a flight controller
//!
//! This library implements the link layer used over the controller's UART or
//! radio bridge: the frame data model with its field packing primitives, and
//! a resynchronizing byte-at-a-time decoder.
//!
//! # Quick Start
//!
//! ```rust
//! use fclink::{Frame, PacketType, StreamDecoder};
//!
//! // Build a frame carrying one float
//! let mut frame = Frame::with_payload(PacketType::Response.as_u8(), &[0u8; 4])?;
//! frame.write_float32(3.14, 0)?;
//!
//! // Render it for the wire
//! let wire = frame.wire_bytes()?;
//!
//! // Decode it again, one byte at a time
//! let mut decoder = StreamDecoder::new();
//! for &byte in wire.iter() {
//!     decoder.feed(byte);
//! }
//! let decoded = decoder.try_take_packet().expect("frame published");
//! assert_eq!(decoded.read_float32(0)?, 3.14);
//! # Ok::<(), fclink::Error>(())
//! ```
//!
//! # Wire Format
//!
//! ```text
//! [0x55] [0xAA] [LENGTH] [TYPE] [PAYLOAD (LENGTH - 2)] [CRC-8]
//! ```
//!
//! The checksum covers `LENGTH`, `TYPE` and the payload. 32-bit fields are
//! little-endian; 16-bit fields are written big-endian and read
//! little-endian.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod decoder;
pub mod protocol;

pub use decoder::{
    DecodeState, DecoderConfig, DecoderStats, Delivery, PacketReceiver, StatsSnapshot,
    StreamDecoder,
};
pub use protocol::{
    CHECKSUM_SEED, ChecksumEngine, Crc8, Error, FILE_DATA_CACHE, Frame, MAX_LENGTH, MAX_WIRE_SIZE,
    MIN_LENGTH, PAYLOAD_CAPACITY, PacketType, Result, SYNC1, SYNC2,
};

/// Link protocol version
pub const VERSION: &str = "1.0";
