//! Error types.

/// Error type for H.264 reframing.
#[derive(Debug, thiserror::Error)]
pub enum H264ConverterError {
    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// Fewer than 4 bytes remain where an AVCC length prefix is expected.
    #[error("not enough bytes for a nal length prefix, {remaining} remaining")]
    IncompleteNalLength {
        /// The number of bytes left in the buffer.
        remaining: usize,
    },
    /// An AVCC length prefix declares more bytes than the buffer holds.
    #[error("nal length {length} is greater than the {remaining} remaining bytes")]
    NalLengthOutOfBounds {
        /// The declared NAL unit length.
        length: usize,
        /// The number of bytes left in the buffer.
        remaining: usize,
    },
    /// A NAL unit header was requested from an empty payload.
    #[error("nal unit payload is empty, no header byte")]
    IncompleteNalHeader,
    /// The forbidden_zero_bit of a NAL unit header is set.
    #[error("forbidden_zero_bit is set")]
    ForbiddenZeroBit,
}
