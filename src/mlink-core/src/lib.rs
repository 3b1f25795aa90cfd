// SPDX-FileCopyrightText: 2026 Marek Lindqvist <marek@mlink.dev>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod error;
pub mod frame;
pub mod measurement;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use error::{DecodeError, EncodeError, MapError};
pub use frame::{decode_frame, encode_frame, Frame, HEADER_SIZE, SOURCE_ID_OFFSET};
pub use measurement::{to_measurement, Measurement, MessageKind, SensorReading};
