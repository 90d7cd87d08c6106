use std::sync::atomic::{AtomicU64, Ordering};

/// Why the decoder abandoned a frame attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    ChecksumMismatch,
    BufferOverflow,
    MalformedLength,
    /// First sync byte not followed by the second one.
    BrokenSync,
}

/// Link health counters for one decoder.
///
/// Shared between the decoder and its receivers; every counter is relaxed
/// and only ever grows.
#[derive(Debug, Default)]
pub struct DecoderStats {
    frames_decoded: AtomicU64,
    checksum_failures: AtomicU64,
    buffer_overflows: AtomicU64,
    malformed_lengths: AtomicU64,
    resyncs: AtomicU64,
    noise_bytes: AtomicU64,
    frames_overwritten: AtomicU64,
}

impl DecoderStats {
    #[inline]
    pub(crate) fn record_frame(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejection(&self, rejection: Rejection) {
        self.resyncs.fetch_add(1, Ordering::Relaxed);
        let counter = match rejection {
            Rejection::ChecksumMismatch => &self.checksum_failures,
            Rejection::BufferOverflow => &self.buffer_overflows,
            Rejection::MalformedLength => &self.malformed_lengths,
            Rejection::BrokenSync => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_noise(&self) {
        self.noise_bytes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_overwrite(&self, count: u64) {
        self.frames_overwritten.fetch_add(count, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            checksum_failures: self.checksum_failures.load(Ordering::Relaxed),
            buffer_overflows: self.buffer_overflows.load(Ordering::Relaxed),
            malformed_lengths: self.malformed_lengths.load(Ordering::Relaxed),
            resyncs: self.resyncs.load(Ordering::Relaxed),
            noise_bytes: self.noise_bytes.load(Ordering::Relaxed),
            frames_overwritten: self.frames_overwritten.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DecoderStats`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    /// Frames that passed checksum validation and were published
    pub frames_decoded: u64,
    /// Frames dropped because the checksum did not match
    pub checksum_failures: u64,
    /// Frames dropped because the declared payload exceeded the buffer
    pub buffer_overflows: u64,
    /// Frames dropped because the length field was below the minimum
    pub malformed_lengths: u64,
    /// Returns to the unsynced state after a partial match or rejection
    pub resyncs: u64,
    /// Bytes discarded while hunting for the first sync byte
    pub noise_bytes: u64,
    /// Published frames replaced before a consumer took them
    pub frames_overwritten: u64,
}

impl StatsSnapshot {
    /// Frames rejected for any reason.
    #[must_use]
    pub fn rejected_frames(&self) -> u64 {
        self.checksum_failures + self.buffer_overflows + self.malformed_lengths
    }
}
