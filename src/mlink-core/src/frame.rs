// SPDX-FileCopyrightText: 2026 Marek Lindqvist <marek@mlink.dev>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Wire framing for the serial sensor transport.
//!
//! Wire format, little-endian multi-byte fields:
//!
//! ```text
//! ┌────────────┬────────────┬──────────┬──────────┬────────────┬──────────────────┐
//! │ source id  │ dest id    │ seq id   │ msg type │ payload sz │ payload          │
//! │ (2B LE)    │ (2B LE)    │ (1B)     │ (1B)     │ (2B LE)    │ (payload sz B)   │
//! └────────────┴────────────┴──────────┴──────────┴────────────┴──────────────────┘
//! ```
//!
//! The transport reserves the lowest source ids for itself, so the id on the
//! wire is the device id shifted up by [`SOURCE_ID_OFFSET`].

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{DecodeError, EncodeError};

/// Frame header: source id (2) + destination id (2) + sequence id (1) +
/// message type (1) + payload size (2) = 8 bytes.
pub const HEADER_SIZE: usize = 8;

/// Number of low source ids reserved by the transport layer.
pub const SOURCE_ID_OFFSET: u16 = 2;

/// One decoded serial-transport packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Originating device id, already corrected for [`SOURCE_ID_OFFSET`].
    pub source_id: u16,
    /// Intended recipient id.
    pub destination_id: u16,
    /// Message sequence id.
    pub sequence_id: u8,
    /// Discriminator selecting how `payload` is interpreted.
    pub message_type: u8,
    /// Message-type-dependent data region.
    ///
    /// Owned copy, detached from the read buffer at decode time; the caller
    /// may reuse or zero its buffer as soon as `decode_frame` returns.
    pub payload: Bytes,
}

/// Decode one frame from a raw buffer.
///
/// The buffer is expected to hold exactly one frame starting at offset 0;
/// trailing bytes beyond the declared payload are ignored.
pub fn decode_frame(buf: &[u8]) -> Result<Frame, DecodeError> {
    if buf.len() < HEADER_SIZE {
        return Err(DecodeError::HeaderTooShort { len: buf.len() });
    }

    let raw_source = u16::from_le_bytes([buf[0], buf[1]]);
    let source_id = raw_source
        .checked_sub(SOURCE_ID_OFFSET)
        .ok_or(DecodeError::InvalidSourceId { raw: raw_source })?;

    let destination_id = u16::from_le_bytes([buf[2], buf[3]]);
    let sequence_id = buf[4];
    let message_type = buf[5];
    let payload_size = u16::from_le_bytes([buf[6], buf[7]]) as usize;

    // Validate before slicing; a size field running past the buffer is bad
    // input, not a reason to truncate or panic.
    if HEADER_SIZE + payload_size > buf.len() {
        return Err(DecodeError::PayloadOutOfBounds {
            declared: payload_size,
            available: buf.len() - HEADER_SIZE,
        });
    }

    Ok(Frame {
        source_id,
        destination_id,
        sequence_id,
        message_type,
        payload: Bytes::copy_from_slice(&buf[HEADER_SIZE..HEADER_SIZE + payload_size]),
    })
}

/// Encode a frame into the wire format, restoring the on-wire source id
/// offset. The inverse of [`decode_frame`]; used by tests and simulators.
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) -> Result<(), EncodeError> {
    if frame.payload.len() > u16::MAX as usize {
        return Err(EncodeError::PayloadTooLarge {
            len: frame.payload.len(),
        });
    }
    let raw_source = frame
        .source_id
        .checked_add(SOURCE_ID_OFFSET)
        .ok_or(EncodeError::SourceIdOutOfRange {
            source_id: frame.source_id,
        })?;

    dst.reserve(HEADER_SIZE + frame.payload.len());
    dst.put_u16_le(raw_source);
    dst.put_u16_le(frame.destination_id);
    dst.put_u8(frame.sequence_id);
    dst.put_u8(frame.message_type);
    dst.put_u16_le(frame.payload.len() as u16);
    dst.put_slice(&frame.payload);
    Ok(())
}
