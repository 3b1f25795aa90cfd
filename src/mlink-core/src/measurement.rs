// SPDX-FileCopyrightText: 2026 Marek Lindqvist <marek@mlink.dev>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Mapping decoded frames to ingest measurements.

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::frame::Frame;

/// The single implicit sensor channel frames address today.
const DEFAULT_SENSOR_ID: u64 = 0;

/// Payload interpretation selected by a frame's message type byte.
///
/// Closed dispatch: adding a message type means adding a variant here along
/// with its own payload decoder, never widening an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Wire value 0: the payload carries one f64 sensor value as its raw
    /// little-endian IEEE-754 bit pattern.
    RawDouble,
}

impl MessageKind {
    /// Resolve the wire discriminator, or `None` for unknown types.
    pub fn from_wire(message_type: u8) -> Option<Self> {
        match message_type {
            0 => Some(Self::RawDouble),
            _ => None,
        }
    }
}

/// A device reading destined for the ingestion endpoint.
///
/// Serializes to the ingest body shape:
/// `{"device_id": <u64>, "sensors": [{"sensor_id": <u64>, "value": <f64>}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub device_id: u64,
    pub sensors: Vec<SensorReading>,
}

/// One sensor channel's value within a [`Measurement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_id: u64,
    pub value: f64,
}

/// Map a decoded frame to a measurement.
///
/// Pure transformation; fails on unknown message types and on payloads too
/// short for the layout their type declares. Never emits a partial
/// measurement.
pub fn to_measurement(frame: &Frame) -> Result<Measurement, MapError> {
    let kind = MessageKind::from_wire(frame.message_type).ok_or(
        MapError::UnsupportedMessageType {
            message_type: frame.message_type,
        },
    )?;

    let value = match kind {
        MessageKind::RawDouble => decode_raw_double(&frame.payload)?,
    };

    Ok(Measurement {
        device_id: u64::from(frame.source_id),
        sensors: vec![SensorReading {
            sensor_id: DEFAULT_SENSOR_ID,
            value,
        }],
    })
}

/// Reinterpret the payload's first 8 bytes as an IEEE-754 double.
///
/// A bit cast of the little-endian u64, not a numeric conversion; the value
/// travels as its raw bit pattern. The length check is deliberate even
/// though the frame decoder bounds-checked the payload: the declared size
/// may legitimately be below 8.
fn decode_raw_double(payload: &[u8]) -> Result<f64, MapError> {
    let bits: [u8; 8] = payload
        .get(..8)
        .and_then(|head| head.try_into().ok())
        .ok_or(MapError::PayloadTooShort {
            len: payload.len(),
        })?;
    Ok(f64::from_bits(u64::from_le_bytes(bits)))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn frame(message_type: u8, payload: &[u8]) -> Frame {
        Frame {
            source_id: 3,
            destination_id: 0,
            sequence_id: 1,
            message_type,
            payload: Bytes::copy_from_slice(payload),
        }
    }

    #[test]
    fn test_raw_double_measurement() {
        let frame = frame(0, &23.5f64.to_bits().to_le_bytes());

        let measurement = to_measurement(&frame).unwrap();
        assert_eq!(measurement.device_id, 3);
        assert_eq!(measurement.sensors.len(), 1);
        assert_eq!(measurement.sensors[0].sensor_id, 0);
        assert!((measurement.sensors[0].value - 23.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unsupported_message_type() {
        let frame = frame(1, &23.5f64.to_bits().to_le_bytes());
        assert_eq!(
            to_measurement(&frame),
            Err(MapError::UnsupportedMessageType { message_type: 1 })
        );
    }

    #[test]
    fn test_payload_too_short() {
        let frame = frame(0, &[0u8; 4]);
        assert_eq!(
            to_measurement(&frame),
            Err(MapError::PayloadTooShort { len: 4 })
        );
    }

    #[test]
    fn test_value_is_bit_cast_not_converted() {
        // An integer payload must come out as the double sharing its bits,
        // not as the numeric value 1.
        let frame = frame(0, &1u64.to_le_bytes());
        let measurement = to_measurement(&frame).unwrap();
        assert_eq!(measurement.sensors[0].value.to_bits(), 1);
    }

    #[test]
    fn test_extra_payload_bytes_ignored() {
        let mut payload = 42.0f64.to_bits().to_le_bytes().to_vec();
        payload.extend_from_slice(&[0xFF; 4]);
        let frame = frame(0, &payload);
        let measurement = to_measurement(&frame).unwrap();
        assert!((measurement.sensors[0].value - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_measurement_json_shape() {
        let measurement = Measurement {
            device_id: 3,
            sensors: vec![SensorReading {
                sensor_id: 0,
                value: 23.5,
            }],
        };

        let json = serde_json::to_value(&measurement).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "device_id": 3,
                "sensors": [{"sensor_id": 0, "value": 23.5}],
            })
        );
    }

    #[test]
    fn test_wire_to_measurement_pipeline() {
        // Raw wire frame: source 5, dest 0, seq 1, type 0, 8-byte payload
        // carrying the bit pattern of 23.5.
        let mut buf = vec![5, 0, 0, 0, 1, 0, 8, 0];
        buf.extend_from_slice(&23.5f64.to_bits().to_le_bytes());

        let frame = crate::frame::decode_frame(&buf).unwrap();
        assert_eq!(frame.source_id, 3);

        let measurement = to_measurement(&frame).unwrap();
        assert_eq!(measurement.device_id, 3);
        assert!((measurement.sensors[0].value - 23.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_message_kind_dispatch_is_closed() {
        assert_eq!(MessageKind::from_wire(0), Some(MessageKind::RawDouble));
        for ty in 1..=u8::MAX {
            assert_eq!(MessageKind::from_wire(ty), None);
        }
    }
}
