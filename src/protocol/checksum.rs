//! Frame checksum engine
//!
//! The checksum covers `[length, type, payload...]` and is seeded with a
//! constant shared by both ends of the link. Any deterministic 8-bit
//! algorithm can be plugged in through [`ChecksumEngine`]; [`Crc8`] is the
//! one used on the wire by default.

/// 8-bit checksum over a frame's checksum region.
pub trait ChecksumEngine: Send + Sync {
    /// Compute the checksum of `bytes[..length]` starting from `seed`.
    ///
    /// `length` is clamped to `bytes.len()`.
    fn compute(&self, bytes: &[u8], length: usize, seed: u8) -> u8;
}

/// CRC-8 with polynomial 0x07 (CRC-8/SMBUS), initialised with the seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc8;

static SMBUS: crc::Crc<u8> = crc::Crc::<u8>::new(&crc::CRC_8_SMBUS);

impl ChecksumEngine for Crc8 {
    #[inline]
    fn compute(&self, bytes: &[u8], length: usize, seed: u8) -> u8 {
        let end = length.min(bytes.len());
        let mut digest = SMBUS.digest_with_initial(seed);
        digest.update(&bytes[..end]);
        digest.finalize()
    }
}
