//! Link frame
//!
//! The frame owns a fixed-capacity payload buffer and the primitives used
//! to pack and unpack typed fields inside it.

use bytes::{BufMut, Bytes, BytesMut};

use super::checksum::{ChecksumEngine, Crc8};
use super::{
    CHECKSUM_SEED, Error, MIN_LENGTH, PAYLOAD_CAPACITY, PacketType, Result, SYNC1, SYNC2,
    WIRE_OVERHEAD,
};

/// One protocol frame
///
/// # Wire Format
///
/// ```text
/// +-------+-------+--------+------+----------------------+----------+
/// | 0x55  | 0xAA  | LENGTH | TYPE | PAYLOAD (LENGTH - 2) | CHECKSUM |
/// +-------+-------+--------+------+----------------------+----------+
///                 |<-------- checksum region -------->|
/// ```
///
/// `LENGTH` counts the type byte, the payload and the checksum byte.
///
/// Equality covers the length, type, live payload and stored checksum.
/// Buffer bytes past the payload are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    sync1: u8,
    sync2: u8,
    length: u8,
    frame_type: u8,
    payload: [u8; PAYLOAD_CAPACITY],
    checksum: u8,
}

impl Frame {
    /// Create an empty frame with the sync markers set and every other field zeroed
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sync1: SYNC1,
            sync2: SYNC2,
            length: 0,
            frame_type: 0,
            payload: [0u8; PAYLOAD_CAPACITY],
            checksum: 0,
        }
    }

    /// Create a frame carrying `payload`, with the length field derived from it
    pub fn with_payload(frame_type: u8, payload: &[u8]) -> Result<Self> {
        let mut frame = Self::new();
        frame.write_bytes(payload, payload.len(), 0)?;
        // write_bytes bounds the payload to PAYLOAD_CAPACITY, so this cannot truncate
        frame.set_length((payload.len() + usize::from(MIN_LENGTH)) as u8)?;
        frame.frame_type = frame_type;
        Ok(frame)
    }

    /// First sync marker
    #[must_use]
    pub const fn sync1(&self) -> u8 {
        self.sync1
    }

    /// Second sync marker
    #[must_use]
    pub const fn sync2(&self) -> u8 {
        self.sync2
    }

    /// Length field
    #[must_use]
    pub const fn length(&self) -> u8 {
        self.length
    }

    /// Set the length field
    ///
    /// The value counts the type byte, the payload and the checksum byte.
    pub fn set_length(&mut self, length: u8) -> Result<()> {
        if length < MIN_LENGTH {
            return Err(Error::MalformedLength { length });
        }
        let payload_len = usize::from(length - MIN_LENGTH);
        if payload_len > PAYLOAD_CAPACITY {
            return Err(Error::BufferOverflow {
                offset: 0,
                len: payload_len,
                capacity: PAYLOAD_CAPACITY,
            });
        }
        self.length = length;
        Ok(())
    }

    /// Raw type byte
    #[must_use]
    pub const fn frame_type(&self) -> u8 {
        self.frame_type
    }

    /// Set the raw type byte
    pub fn set_type(&mut self, frame_type: u8) {
        self.frame_type = frame_type;
    }

    /// Type byte resolved against the packet registry
    #[must_use]
    pub fn packet_type(&self) -> Option<PacketType> {
        PacketType::from_u8(self.frame_type)
    }

    /// Number of payload bytes implied by the length field
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.length.saturating_sub(MIN_LENGTH) as usize
    }

    /// Live payload bytes
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_len()]
    }

    /// Stored checksum byte
    #[must_use]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Overwrite the stored checksum byte
    pub fn set_checksum(&mut self, checksum: u8) {
        self.checksum = checksum;
    }

    fn check_bounds(offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= PAYLOAD_CAPACITY => Ok(()),
            _ => Err(Error::BufferOverflow {
                offset,
                len,
                capacity: PAYLOAD_CAPACITY,
            }),
        }
    }

    /// Copy the first `len` bytes of `src` into the payload at `offset`
    pub fn write_bytes(&mut self, src: &[u8], len: usize, offset: usize) -> Result<()> {
        Self::check_bounds(offset, len)?;
        if len > src.len() {
            return Err(Error::BufferOverflow {
                offset: 0,
                len,
                capacity: src.len(),
            });
        }
        self.payload[offset..offset + len].copy_from_slice(&src[..len]);
        Ok(())
    }

    /// Store one byte at `offset`
    pub fn write_byte(&mut self, byte: u8, offset: usize) -> Result<()> {
        Self::check_bounds(offset, 1)?;
        self.payload[offset] = byte;
        Ok(())
    }

    /// Store an IEEE-754 float, little-endian
    pub fn write_float32(&mut self, value: f32, offset: usize) -> Result<()> {
        self.write_bytes(&value.to_le_bytes(), 4, offset)
    }

    /// Store a two's-complement integer, little-endian
    pub fn write_int32(&mut self, value: i32, offset: usize) -> Result<()> {
        self.write_bytes(&value.to_le_bytes(), 4, offset)
    }

    /// Store a 16-bit value, **big-endian**
    ///
    /// [`read_uint16`](Self::read_uint16) decodes little-endian; the two are
    /// not inverses of each other.
    pub fn write_uint16(&mut self, value: u16, offset: usize) -> Result<()> {
        self.write_bytes(&value.to_be_bytes(), 2, offset)
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        Self::check_bounds(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.payload[offset..offset + N]);
        Ok(out)
    }

    /// Read a little-endian IEEE-754 float
    pub fn read_float32(&self, offset: usize) -> Result<f32> {
        self.read_array(offset).map(f32::from_le_bytes)
    }

    /// Read a little-endian two's-complement integer
    pub fn read_int32(&self, offset: usize) -> Result<i32> {
        self.read_array(offset).map(i32::from_le_bytes)
    }

    /// Read a 16-bit value, **little-endian** (low byte at `offset`)
    pub fn read_uint16(&self, offset: usize) -> Result<u16> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    /// Copy `len` raw payload bytes starting at `offset`
    ///
    /// No text encoding is assumed.
    pub fn read_string(&self, offset: usize, len: usize) -> Result<Bytes> {
        Self::check_bounds(offset, len)?;
        Ok(Bytes::copy_from_slice(&self.payload[offset..offset + len]))
    }

    fn ensure_length(&self) -> Result<()> {
        if self.length < MIN_LENGTH {
            return Err(Error::MalformedLength {
                length: self.length,
            });
        }
        Ok(())
    }

    /// Bytes covered by the checksum: `[length, type, payload...]`
    ///
    /// The result is exactly `length` bytes long.
    pub fn checksum_region(&self) -> Result<Bytes> {
        self.ensure_length()?;
        let mut region = BytesMut::with_capacity(usize::from(self.length));
        region.put_u8(self.length);
        region.put_u8(self.frame_type);
        region.put_slice(self.payload());
        Ok(region.freeze())
    }

    /// Checksum of this frame with the default engine and seed
    pub fn compute_checksum(&self) -> Result<u8> {
        self.compute_checksum_with(&Crc8, CHECKSUM_SEED)
    }

    /// Checksum of this frame with an explicit engine and seed
    pub fn compute_checksum_with<E>(&self, engine: &E, seed: u8) -> Result<u8>
    where
        E: ChecksumEngine + ?Sized,
    {
        let region = self.checksum_region()?;
        Ok(engine.compute(&region, usize::from(self.length), seed))
    }

    /// Compare the stored checksum against a freshly computed one
    pub fn verify(&self) -> Result<()> {
        let expected = self.compute_checksum()?;
        if expected != self.checksum {
            return Err(Error::ChecksumMismatch {
                expected,
                found: self.checksum,
            });
        }
        Ok(())
    }

    /// Render the full transmittable frame
    ///
    /// The trailing checksum is always recomputed, so the stored checksum
    /// field does not need to be kept in sync by the caller. The result is
    /// `length + 3` bytes long.
    pub fn wire_bytes(&self) -> Result<Bytes> {
        let checksum = self.compute_checksum()?;
        let mut wire = BytesMut::with_capacity(usize::from(self.length) + WIRE_OVERHEAD);
        wire.put_u8(self.sync1);
        wire.put_u8(self.sync2);
        wire.put_u8(self.length);
        wire.put_u8(self.frame_type);
        wire.put_slice(self.payload());
        wire.put_u8(checksum);
        Ok(wire.freeze())
    }

    /// Independent value copy of this frame
    #[must_use]
    pub const fn copy(&self) -> Self {
        *self
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.frame_type == other.frame_type
            && self.checksum == other.checksum
            && self.payload() == other.payload()
    }
}

impl Eq for Frame {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_fields() {
        let frame = Frame::new();
        assert_eq!(frame.sync1(), 0x55);
        assert_eq!(frame.sync2(), 0xAA);
        assert_eq!(frame.length(), 0);
        assert_eq!(frame.frame_type(), 0);
        assert_eq!(frame.checksum(), 0);
        assert!(frame.payload().is_empty());
        assert_eq!(frame.read_string(0, PAYLOAD_CAPACITY).unwrap(), vec![0u8; 85]);
    }

    #[test]
    fn test_set_length_bounds() {
        let mut frame = Frame::new();
        assert!(matches!(
            frame.set_length(1),
            Err(Error::MalformedLength { length: 1 })
        ));
        assert!(matches!(
            frame.set_length(88),
            Err(Error::BufferOverflow { len: 86, .. })
        ));
        frame.set_length(87).unwrap();
        assert_eq!(frame.payload_len(), PAYLOAD_CAPACITY);
        frame.set_length(2).unwrap();
        assert_eq!(frame.payload_len(), 0);
    }

    #[test]
    fn test_write_bytes_rejects_overflow() {
        let mut frame = Frame::new();
        assert!(frame.write_bytes(&[1, 2, 3], 3, 82).is_ok());
        assert!(matches!(
            frame.write_bytes(&[1, 2, 3], 3, 83),
            Err(Error::BufferOverflow {
                offset: 83,
                len: 3,
                capacity: 85
            })
        ));
        assert!(frame.write_byte(9, 85).is_err());
        assert!(frame.write_bytes(&[1], 1, usize::MAX).is_err());
        // Failed writes leave the buffer untouched
        assert_eq!(frame.read_string(82, 3).unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_write_bytes_rejects_short_source() {
        let mut frame = Frame::new();
        assert!(frame.write_bytes(&[1, 2], 3, 0).is_err());
    }

    #[test]
    fn test_float32_is_little_endian() {
        let mut frame = Frame::new();
        frame.write_float32(1.0, 0).unwrap();
        assert_eq!(frame.read_string(0, 4).unwrap().as_ref(), &[0x00, 0x00, 0x80, 0x3F]);
        assert_eq!(frame.read_float32(0).unwrap(), 1.0);
    }

    #[test]
    fn test_int32_is_little_endian() {
        let mut frame = Frame::new();
        frame.write_int32(-2, 4).unwrap();
        assert_eq!(frame.read_string(4, 4).unwrap().as_ref(), &[0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(frame.read_int32(4).unwrap(), -2);

        frame.write_int32(0x1234_5678, 0).unwrap();
        assert_eq!(frame.read_string(0, 4).unwrap().as_ref(), &[0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_write_uint16_is_big_endian() {
        let mut frame = Frame::new();
        frame.write_uint16(0x1234, 10).unwrap();
        assert_eq!(frame.read_string(10, 2).unwrap().as_ref(), &[0x12, 0x34]);
    }

    #[test]
    fn test_read_uint16_is_little_endian() {
        let mut frame = Frame::new();
        frame.write_bytes(&[0x34, 0x12], 2, 0).unwrap();
        assert_eq!(frame.read_uint16(0).unwrap(), 0x1234);
    }

    #[test]
    fn test_uint16_write_then_read_swaps_bytes() {
        let mut frame = Frame::new();
        frame.write_uint16(0x1234, 0).unwrap();
        assert_eq!(frame.read_uint16(0).unwrap(), 0x3412);
    }

    #[test]
    fn test_reads_are_bounds_checked() {
        let frame = Frame::new();
        assert!(frame.read_float32(82).is_err());
        assert!(frame.read_int32(84).is_err());
        assert!(frame.read_uint16(84).is_err());
        assert!(frame.read_uint16(83).is_ok());
        assert!(frame.read_string(80, 6).is_err());
    }

    #[test]
    fn test_checksum_region_layout() {
        let frame = Frame::with_payload(0x22, &[0x07, 0x10]).unwrap();
        let region = frame.checksum_region().unwrap();
        assert_eq!(region.as_ref(), &[0x04, 0x22, 0x07, 0x10]);
        assert_eq!(region.len(), usize::from(frame.length()));
    }

    #[test]
    fn test_unset_length_is_malformed() {
        let frame = Frame::new();
        assert!(matches!(
            frame.checksum_region(),
            Err(Error::MalformedLength { length: 0 })
        ));
        assert!(frame.wire_bytes().is_err());
        assert!(frame.compute_checksum().is_err());
    }

    #[test]
    fn test_wire_bytes_layout() {
        let frame = Frame::with_payload(0x44, &[0x03]).unwrap();
        let wire = frame.wire_bytes().unwrap();
        let crc = Crc8.compute(&[0x03, 0x44, 0x03], 3, CHECKSUM_SEED);
        assert_eq!(wire.as_ref(), &[0x55, 0xAA, 0x03, 0x44, 0x03, crc]);
        assert_eq!(wire.len(), usize::from(frame.length()) + 3);
    }

    #[test]
    fn test_wire_bytes_recomputes_stale_checksum() {
        let mut frame = Frame::with_payload(0x01, &[]).unwrap();
        frame.set_checksum(0x00);
        let wire = frame.wire_bytes().unwrap();
        assert_eq!(wire[4], frame.compute_checksum().unwrap());
    }

    #[test]
    fn test_verify() {
        let mut frame = Frame::with_payload(0x11, &[1, 2, 3]).unwrap();
        let crc = frame.compute_checksum().unwrap();
        frame.set_checksum(crc);
        assert!(frame.verify().is_ok());

        frame.set_checksum(crc.wrapping_add(1));
        assert!(matches!(
            frame.verify(),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_copy_is_independent() {
        let mut working = Frame::with_payload(0x11, &[1, 2, 3, 4]).unwrap();
        let published = working.copy();
        working.write_byte(0xFF, 0).unwrap();
        working.set_type(0x22);
        assert_eq!(published.payload(), &[1, 2, 3, 4]);
        assert_eq!(published.frame_type(), 0x11);
    }

    #[test]
    fn test_equality_ignores_stale_buffer_bytes() {
        let mut reused = Frame::with_payload(0x11, &[1, 2, 3, 4]).unwrap();
        reused.set_length(3).unwrap();
        let fresh = Frame::with_payload(0x11, &[1]).unwrap();
        assert_eq!(reused.read_string(1, 3).unwrap().as_ref(), &[2, 3, 4]);
        assert_eq!(reused, fresh);

        let mut other_checksum = fresh;
        other_checksum.set_checksum(0x5A);
        assert_ne!(other_checksum, fresh);
        assert_ne!(Frame::with_payload(0x11, &[2]).unwrap(), fresh);
        assert_ne!(Frame::with_payload(0x12, &[1]).unwrap(), fresh);
    }

    #[test]
    fn test_with_payload_rejects_oversize() {
        let payload = [0u8; PAYLOAD_CAPACITY + 1];
        assert!(matches!(
            Frame::with_payload(0x81, &payload),
            Err(Error::BufferOverflow { .. })
        ));
        assert!(Frame::with_payload(0x81, &payload[..PAYLOAD_CAPACITY]).is_ok());
    }

    #[test]
    fn test_packet_type_lookup() {
        let frame = Frame::with_payload(0x67, b"v1.2").unwrap();
        assert_eq!(frame.packet_type(), Some(PacketType::VersionResponse));
        assert_eq!(frame.read_string(0, 4).unwrap().as_ref(), b"v1.2");

        let unknown = Frame::with_payload(0xEE, &[]).unwrap();
        assert_eq!(unknown.packet_type(), None);
    }
}
