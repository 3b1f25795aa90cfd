// SPDX-FileCopyrightText: 2026 Marek Lindqvist <marek@mlink.dev>
//
// SPDX-License-Identifier: BSD-2-Clause

/// Errors raised while decoding a raw buffer into a [`Frame`](crate::Frame).
///
/// All variants are input-validation failures; none of them is fatal to the
/// host process, which is expected to log, drop the frame and keep reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer does not even hold the 8-byte header.
    #[error("buffer too short for frame header ({len} bytes, need at least 8)")]
    HeaderTooShort { len: usize },

    /// The declared payload size runs past the end of the buffer.
    #[error("declared payload of {declared} bytes exceeds the {available} bytes after the header")]
    PayloadOutOfBounds { declared: usize, available: usize },

    /// The raw on-wire source id sits inside the transport-reserved range.
    #[error("raw source id {raw} is reserved by the transport layer")]
    InvalidSourceId { raw: u16 },
}

/// Errors raised while mapping a decoded frame to a measurement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The frame's message type byte names no known payload layout.
    #[error("unsupported message type {message_type}")]
    UnsupportedMessageType { message_type: u8 },

    /// The payload is too short for the layout its message type declares.
    #[error("payload too short for a raw double ({len} bytes, need 8)")]
    PayloadTooShort { len: usize },
}

/// Errors raised while encoding a frame onto the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The payload does not fit the 16-bit size field.
    #[error("payload too large for the 16-bit size field ({len} bytes)")]
    PayloadTooLarge { len: usize },

    /// The source id cannot be shifted into the on-wire range.
    #[error("source id {source_id} does not fit on the wire after the reserved offset")]
    SourceIdOutOfRange { source_id: u16 },
}
