//! Reframing of H.264 elementary streams between the AVCC and Annex B
//! conventions.
//!
//! AVCC (used by MP4/FLV-style containers) prefixes every NAL unit with a
//! 4-byte big-endian length. Annex B (used by raw and transport streams)
//! separates NAL units with the start code `00 00 00 01` (or `00 00 01`).
//! This crate converts between the two framings and exposes the pieces of
//! the AVC decoder configuration record that callers need along the way:
//!
//! - [`convert::avcc_to_annexb`] / [`convert::annexb_to_avcc`] for the pure
//!   transforms.
//! - [`convert::avcc_to_annexb_in_place`] for the packet-type-directed
//!   variant that injects SPS/PPS in front of IDR slices.
//! - [`AVCDecoderConfigurationRecord`] for parsing/building the
//!   configuration record and extracting its parameter sets in Annex-B form.
//! - [`config::profile_string`] for the `PPCCLL` profile string.
//!
//! ## Specifications
//!
//! | Name | Link | Comments |
//! | --- | --- | --- |
//! | ISO/IEC 14496-10 | <https://www.iso.org/standard/83529.html> | NAL unit syntax, Annex B byte stream format |
//! | ISO/IEC 14496-15 | <https://www.iso.org/standard/89118.html> | AVCDecoderConfigurationRecord, AVCC framing |
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or [Apache-2.0](./LICENSE.Apache-2.0) license.
//! You can choose between one of them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

/// Decoder configuration record functionality.
pub mod config;
/// AVCC and Annex B conversion functionality.
pub mod convert;
/// Enums for NAL unit types and packet types.
pub mod enums;
/// Error types.
pub mod error;
/// NAL unit header functionality.
pub mod header;

pub use self::config::{AVCDecoderConfigurationRecord, AvccExtendedConfig};
pub use self::convert::{annexb_to_avcc, avcc_to_annexb, avcc_to_annexb_in_place};
pub use self::enums::{AvcPacketType, NalUnitType};
pub use self::error::H264ConverterError;
pub use self::header::NalUnitHeader;
