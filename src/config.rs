//! Decoder configuration record functionality.

use std::io;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use scuffle_bytes_util::BytesCursorExt;

use crate::convert::ANNEXB_START_CODE;

/// The AVC (H.264) Decoder Configuration Record.
///
/// This is the out-of-band codec configuration that AVCC-framed containers
/// carry in place of in-stream SPS/PPS NAL units.
/// ISO/IEC 14496-15 - 5.3.2.1.2
#[derive(Debug, Clone, PartialEq)]
pub struct AVCDecoderConfigurationRecord {
    /// The `configuration_version`, always 1 until the spec says otherwise.
    pub configuration_version: u8,
    /// The `AVCProfileIndication`, a copy of the `profile_idc` byte from SPS.
    pub profile_indication: u8,
    /// The `profile_compatibility` byte (constraint set flags).
    pub profile_compatibility: u8,
    /// The `AVCLevelIndication`, a copy of the `level_idc` byte from SPS.
    pub level_indication: u8,
    /// The NAL length field width minus one. AVCC payloads produced by this
    /// crate always use 3 (4-byte lengths).
    pub length_size_minus_one: u8,
    /// The SPS NAL units, in ascending SPS ID order.
    pub sps: Vec<Bytes>,
    /// The PPS NAL units, in ascending PPS ID order.
    pub pps: Vec<Bytes>,
    /// Chroma/bit-depth fields present for profiles other than 66, 77 and 88.
    pub extended_config: Option<AvccExtendedConfig>,
}

/// The trailing chroma and bit-depth fields of the configuration record.
/// ISO/IEC 14496-15 - 5.3.2.1.2
#[derive(Debug, Clone, PartialEq)]
pub struct AvccExtendedConfig {
    /// The `chroma_format_idc` from ISO/IEC 14496-10 (2 bits).
    pub chroma_format_idc: u8,
    /// Bit depth of luma samples minus 8 (3 bits).
    pub bit_depth_luma_minus8: u8,
    /// Bit depth of chroma samples minus 8 (3 bits).
    pub bit_depth_chroma_minus8: u8,
    /// The SPS extension NAL units.
    pub sequence_parameter_set_ext: Vec<Bytes>,
}

fn parse_parameter_sets(reader: &mut io::Cursor<Bytes>, count: usize) -> io::Result<Vec<Bytes>> {
    let mut sets = Vec::with_capacity(count);
    for _ in 0..count {
        let length = reader.read_u16::<BigEndian>()?;
        sets.push(reader.extract_bytes(length as usize)?);
    }

    Ok(sets)
}

impl AVCDecoderConfigurationRecord {
    /// Parses a configuration record from a byte stream.
    pub fn parse(reader: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let configuration_version = reader.read_u8()?;
        let profile_indication = reader.read_u8()?;
        let profile_compatibility = reader.read_u8()?;
        let level_indication = reader.read_u8()?;
        let length_size_minus_one = reader.read_u8()? & 0b0000_0011;

        let num_of_sequence_parameter_sets = reader.read_u8()? & 0b0001_1111;
        let sps = parse_parameter_sets(reader, num_of_sequence_parameter_sets as usize)?;

        let num_of_picture_parameter_sets = reader.read_u8()?;
        let pps = parse_parameter_sets(reader, num_of_picture_parameter_sets as usize)?;

        // Profiles 66, 77 and 88 never carry the extended fields. For the
        // rest, some muxers omit them anyway, so their absence is tolerated.
        let extended_config = match profile_indication {
            66 | 77 | 88 => None,
            _ if !reader.has_remaining() => None,
            _ => {
                let chroma_format_idc = reader.read_u8()? & 0b0000_0011;
                let bit_depth_luma_minus8 = reader.read_u8()? & 0b0000_0111;
                let bit_depth_chroma_minus8 = reader.read_u8()? & 0b0000_0111;
                let number_of_sequence_parameter_set_ext = reader.read_u8()?;
                let sequence_parameter_set_ext =
                    parse_parameter_sets(reader, number_of_sequence_parameter_set_ext as usize)?;

                Some(AvccExtendedConfig {
                    chroma_format_idc,
                    bit_depth_luma_minus8,
                    bit_depth_chroma_minus8,
                    sequence_parameter_set_ext,
                })
            }
        };

        Ok(Self {
            configuration_version,
            profile_indication,
            profile_compatibility,
            level_indication,
            length_size_minus_one,
            sps,
            pps,
            extended_config,
        })
    }

    /// Returns the total byte size of the built configuration record.
    pub fn size(&self) -> u64 {
        let parameter_set_size = |sets: &[Bytes]| sets.iter().map(|set| 2 + set.len() as u64).sum::<u64>();

        // version, profile, compatibility, level, length size, sps count
        6 + parameter_set_size(&self.sps)
            + 1 // num_of_picture_parameter_sets
            + parameter_set_size(&self.pps)
            + match &self.extended_config {
                // chroma format, two bit depths, sps ext count
                Some(config) => 4 + parameter_set_size(&config.sequence_parameter_set_ext),
                None => 0,
            }
    }

    /// Builds the configuration record into a byte stream.
    ///
    /// All fields are byte aligned; reserved bits are written as ones as the
    /// spec requires.
    pub fn build<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        writer.write_u8(self.configuration_version)?;
        writer.write_u8(self.profile_indication)?;
        writer.write_u8(self.profile_compatibility)?;
        writer.write_u8(self.level_indication)?;
        writer.write_u8(0b1111_1100 | (self.length_size_minus_one & 0b0000_0011))?;

        writer.write_u8(0b1110_0000 | (self.sps.len() as u8 & 0b0001_1111))?;
        for sps in &self.sps {
            writer.write_u16::<BigEndian>(sps.len() as u16)?;
            writer.write_all(sps)?;
        }

        writer.write_u8(self.pps.len() as u8)?;
        for pps in &self.pps {
            writer.write_u16::<BigEndian>(pps.len() as u16)?;
            writer.write_all(pps)?;
        }

        if let Some(config) = &self.extended_config {
            writer.write_u8(0b1111_1100 | (config.chroma_format_idc & 0b0000_0011))?;
            writer.write_u8(0b1111_1000 | (config.bit_depth_luma_minus8 & 0b0000_0111))?;
            writer.write_u8(0b1111_1000 | (config.bit_depth_chroma_minus8 & 0b0000_0111))?;

            writer.write_u8(config.sequence_parameter_set_ext.len() as u8)?;
            for sps_ext in &config.sequence_parameter_set_ext {
                writer.write_u16::<BigEndian>(sps_ext.len() as u16)?;
                writer.write_all(sps_ext)?;
            }
        }

        Ok(())
    }

    /// Returns the parameter sets as an Annex-B buffer: every SPS, then
    /// every PPS, each preceded by the 4-byte start code.
    ///
    /// This is the buffer [`crate::convert::avcc_to_annexb_in_place`] expects
    /// for keyframe injection.
    pub fn sps_pps_annexb(&self) -> Bytes {
        let mut annexb = BytesMut::with_capacity(
            self.sps.iter().chain(self.pps.iter()).map(|set| ANNEXB_START_CODE.len() + set.len()).sum(),
        );

        for set in self.sps.iter().chain(self.pps.iter()) {
            annexb.put_slice(&ANNEXB_START_CODE);
            annexb.put_slice(set);
        }

        annexb.freeze()
    }
}

/// Formats the profile of a raw configuration record as a 6-hex-digit
/// `PPCCLL` string: profile indication, compatibility flags and level
/// indication, two lowercase hex digits each.
///
/// Returns an empty string if no buffer is given or if it does not parse as
/// a configuration record. This accessor is best effort by design.
pub fn profile_string(avc_decoder_configuration_record: Option<&Bytes>) -> String {
    let Some(data) = avc_decoder_configuration_record else {
        return String::new();
    };

    let Ok(record) = AVCDecoderConfigurationRecord::parse(&mut io::Cursor::new(data.clone())) else {
        return String::new();
    };

    format!(
        "{:02x}{:02x}{:02x}",
        record.profile_indication, record.profile_compatibility, record.level_indication
    )
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use bytes::Bytes;

    use crate::config::{AVCDecoderConfigurationRecord, AvccExtendedConfig, profile_string};

    fn baseline_record() -> AVCDecoderConfigurationRecord {
        AVCDecoderConfigurationRecord {
            configuration_version: 1,
            profile_indication: 66,
            profile_compatibility: 0xC0,
            level_indication: 31,
            length_size_minus_one: 3,
            sps: vec![Bytes::from_static(&[0x67, 0x42, 0xC0, 0x1F, 0x8C])],
            pps: vec![Bytes::from_static(&[0x68, 0xCE, 0x3C, 0x80])],
            extended_config: None,
        }
    }

    #[test]
    fn test_parse() {
        let mut data = Vec::new();
        baseline_record().build(&mut data).unwrap();

        let record = AVCDecoderConfigurationRecord::parse(&mut io::Cursor::new(data.into())).unwrap();

        insta::assert_debug_snapshot!(record, @r#"
        AVCDecoderConfigurationRecord {
            configuration_version: 1,
            profile_indication: 66,
            profile_compatibility: 192,
            level_indication: 31,
            length_size_minus_one: 3,
            sps: [
                b"gB\xc0\x1f\x8c",
            ],
            pps: [
                b"h\xce<\x80",
            ],
            extended_config: None,
        }
        "#);
    }

    #[test]
    fn test_build_round_trip_with_extended_config() {
        let record = AVCDecoderConfigurationRecord {
            profile_indication: 100,
            extended_config: Some(AvccExtendedConfig {
                chroma_format_idc: 1,
                bit_depth_luma_minus8: 0,
                bit_depth_chroma_minus8: 0,
                sequence_parameter_set_ext: vec![Bytes::from_static(b"ext")],
            }),
            ..baseline_record()
        };

        let mut data = Vec::new();
        record.build(&mut data).unwrap();
        assert_eq!(record.size(), data.len() as u64);

        let parsed = AVCDecoderConfigurationRecord::parse(&mut io::Cursor::new(data.into())).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_no_extended_config_for_baseline_profiles() {
        let mut data = Vec::new();
        baseline_record().build(&mut data).unwrap();

        let record = AVCDecoderConfigurationRecord::parse(&mut io::Cursor::new(data.into())).unwrap();
        assert_eq!(record.extended_config, None);
    }

    #[test]
    fn test_missing_extended_config_is_tolerated() {
        let record = AVCDecoderConfigurationRecord {
            profile_indication: 100,
            ..baseline_record()
        };

        // Built without the extended fields, as some muxers emit it.
        let mut data = Vec::new();
        record.build(&mut data).unwrap();

        let parsed = AVCDecoderConfigurationRecord::parse(&mut io::Cursor::new(data.into())).unwrap();
        assert_eq!(parsed.extended_config, None);
    }

    #[test]
    fn test_sps_pps_annexb() {
        let annexb = baseline_record().sps_pps_annexb();

        let mut expected = Vec::new();
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x67, 0x42, 0xC0, 0x1F, 0x8C]);
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x68, 0xCE, 0x3C, 0x80]);

        assert_eq!(annexb, expected);
    }

    #[test]
    fn test_profile_string() {
        let mut data = Vec::new();
        AVCDecoderConfigurationRecord {
            profile_indication: 0x64,
            profile_compatibility: 0x00,
            level_indication: 0x1F,
            ..baseline_record()
        }
        .build(&mut data)
        .unwrap();

        assert_eq!(profile_string(Some(&data.into())), "64001f");
    }

    #[test]
    fn test_profile_string_baseline() {
        let mut data = Vec::new();
        baseline_record().build(&mut data).unwrap();

        assert_eq!(profile_string(Some(&data.into())), "42c01f");
    }

    #[test]
    fn test_profile_string_empty_on_missing_or_invalid_input() {
        assert_eq!(profile_string(None), "");
        assert_eq!(profile_string(Some(&Bytes::from_static(&[0x01, 0x64]))), "");
    }
}
