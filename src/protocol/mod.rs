//! Link protocol core
//!
//! This module provides the frame data model, the checksum engine and the
//! packet type registry.

mod checksum;
mod codes;
mod error;
mod frame;
mod types;

pub use checksum::{ChecksumEngine, Crc8};
pub use codes::{
    ACC_CALIBRATE_VERIFY, ADC_CALIBRATE_H, ADC_CALIBRATE_L, DSN_FORCE_UPDATE_VERIFY,
    DSN_VERIFY_DATA, Device, ESC_VERIFY_DATA, FirmwareType, ForceCommand, MtdOperation,
    ProgramAction, UpgradeRefusal, UpgradeState, VOLT_VERIFY_DATA,
};
pub use error::{Error, Result};
pub use frame::Frame;
pub use types::PacketType;

/// First sync byte
pub const SYNC1: u8 = 0x55;

/// Second sync byte
pub const SYNC2: u8 = 0xAA;

/// Checksum seed shared by encoder and decoder
pub const CHECKSUM_SEED: u8 = 0x66;

/// Usable firmware data bytes per upgrade chunk
pub const FILE_DATA_CACHE: usize = 80;

/// Payload buffer capacity (file data plus chunk header)
pub const PAYLOAD_CAPACITY: usize = FILE_DATA_CACHE + 5;

/// Smallest valid length field (type byte + checksum byte)
pub const MIN_LENGTH: u8 = 2;

/// Largest valid length field
pub const MAX_LENGTH: u8 = PAYLOAD_CAPACITY as u8 + MIN_LENGTH;

/// Bytes on the wire not counted by the length field (sync pair + length)
pub const WIRE_OVERHEAD: usize = 3;

/// Largest frame on the wire
pub const MAX_WIRE_SIZE: usize = MAX_LENGTH as usize + WIRE_OVERHEAD;
