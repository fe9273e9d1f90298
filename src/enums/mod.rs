//! Enums for NAL unit types and packet types.

mod avc_packet_type;
mod nal_unit_type;

pub use self::avc_packet_type::AvcPacketType;
pub use self::nal_unit_type::NalUnitType;
