//! AVCC and Annex B conversion functionality.
//!
//! Both directions reframe the same conceptual NAL unit sequence. AVCC
//! framing carries an explicit, checkable contract (every unit is preceded
//! by a 4-byte big-endian length), so the AVCC to Annex B direction
//! validates and can fail. Annex B framing is discovered by scanning for
//! start codes, and any input is reframable, so the reverse direction has
//! no error path.

use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use scuffle_bytes_util::BytesCursorExt;

use crate::enums::{AvcPacketType, NalUnitType};
use crate::error::H264ConverterError;
use crate::header::NalUnitHeader;

/// The 4-byte Annex B start code.
pub const ANNEXB_START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// Walks an AVCC buffer and appends every NAL unit to `annexb` behind a
/// 4-byte start code, handing each payload to `on_nal` as it goes.
///
/// Fails without touching `annexb`'s existing contents beyond what was
/// already appended; callers discard the output buffer on error.
fn reframe_avcc(
    data: &Bytes,
    annexb: &mut BytesMut,
    mut on_nal: impl FnMut(&Bytes),
) -> Result<(), H264ConverterError> {
    let mut reader = io::Cursor::new(data.clone());

    while reader.has_remaining() {
        if reader.remaining() < 4 {
            return Err(H264ConverterError::IncompleteNalLength {
                remaining: reader.remaining(),
            });
        }

        let nal_length = reader.read_u32::<BigEndian>()? as usize;

        if reader.remaining() < nal_length {
            return Err(H264ConverterError::NalLengthOutOfBounds {
                length: nal_length,
                remaining: reader.remaining(),
            });
        }

        let nal_data = reader.extract_bytes(nal_length)?;

        annexb.put_slice(&ANNEXB_START_CODE);
        annexb.put_slice(&nal_data);
        on_nal(&nal_data);
    }

    Ok(())
}

/// Converts an AVCC buffer into a newly allocated Annex B buffer.
///
/// Every length prefix is validated against the remaining input before its
/// payload is taken; a truncated prefix or an overlong declared length is an
/// error and no partial output is returned.
pub fn avcc_to_annexb(data: &Bytes) -> Result<Bytes, H264ConverterError> {
    // Start codes add 4 bytes per NAL unit, 1.5x input covers typical
    // payload sizes without growing.
    let mut annexb = BytesMut::with_capacity(data.len() + data.len() / 2);
    reframe_avcc(data, &mut annexb, |_| {})?;

    Ok(annexb.freeze())
}

/// Converts a packet body to Annex B in place, injecting parameter sets in
/// front of keyframes.
///
/// - A [`AvcPacketType::SeqHdr`] packet is replaced by `sps_pps_annexb`
///   verbatim (the body is a configuration record, not NAL units).
/// - A [`AvcPacketType::Nalu`] packet is reframed like [`avcc_to_annexb`].
///   If any of its NAL units is an IDR slice and `sps_pps_annexb` is given,
///   the parameter sets are prepended so decoders see SPS/PPS immediately
///   before the keyframe.
/// - Any other packet type is left untouched.
///
/// On a framing error the buffer is left untouched. If the reframed output
/// is empty (a zero-length packet, or a sequence header without parameter
/// sets) the buffer is also left as-is rather than cleared.
pub fn avcc_to_annexb_in_place(
    packet_type: AvcPacketType,
    data: &mut BytesMut,
    sps_pps_annexb: Option<&Bytes>,
) -> Result<(), H264ConverterError> {
    avcc_to_annexb_in_place_with(packet_type, data, sps_pps_annexb, |nal| {
        NalUnitHeader::parse(nal).ok().map(|header| header.nal_unit_type)
    })
}

/// [`avcc_to_annexb_in_place`] with a caller-supplied NAL unit classifier.
///
/// `classify` is called with each extracted NAL payload and decides whether
/// it is an IDR slice; returning `None` skips the unit. The plain entry
/// point uses [`NalUnitHeader::parse`].
pub fn avcc_to_annexb_in_place_with(
    packet_type: AvcPacketType,
    data: &mut BytesMut,
    sps_pps_annexb: Option<&Bytes>,
    mut classify: impl FnMut(&[u8]) -> Option<NalUnitType>,
) -> Result<(), H264ConverterError> {
    let annexb = match packet_type {
        AvcPacketType::SeqHdr => match sps_pps_annexb {
            Some(sps_pps) => BytesMut::from(sps_pps.as_ref()),
            None => BytesMut::new(),
        },
        AvcPacketType::Nalu => {
            let input = data.clone().freeze();
            let mut annexb = BytesMut::with_capacity(input.len() + input.len() / 2);
            let mut has_idr_slice = false;

            reframe_avcc(&input, &mut annexb, |nal| {
                if classify(nal).is_some_and(NalUnitType::is_idr) {
                    has_idr_slice = true;
                }
            })?;

            if let Some(sps_pps) = sps_pps_annexb {
                if has_idr_slice {
                    let mut with_parameter_sets = BytesMut::with_capacity(sps_pps.len() + annexb.len());
                    with_parameter_sets.put_slice(sps_pps);
                    with_parameter_sets.put_slice(&annexb);
                    annexb = with_parameter_sets;
                }
            }

            annexb
        }
        _ => return Ok(()),
    };

    if !annexb.is_empty() {
        data.clear();
        data.extend_from_slice(&annexb);
    }

    Ok(())
}

/// Probes for a start code at the beginning of `data`, longest pattern
/// first. Returns the size of the matched pattern.
fn start_code_size(data: &[u8]) -> Option<usize> {
    if data.starts_with(&[0x00, 0x00, 0x00, 0x01]) {
        return Some(4);
    }

    if data.starts_with(&[0x00, 0x00, 0x01]) {
        return Some(3);
    }

    None
}

/// Converts an Annex B buffer into a newly allocated AVCC buffer.
///
/// NAL unit boundaries are discovered by scanning for 4-byte and 3-byte
/// start codes; each unit is emitted behind a 4-byte big-endian length
/// (`length_size_minus_one == 3`). Start codes cannot occur inside NAL
/// payloads, so no escaping logic is needed.
///
/// This direction never fails: input without any recognizable start code is
/// emitted as a single NAL unit spanning the whole buffer.
pub fn annexb_to_avcc(data: &[u8]) -> Bytes {
    let mut avcc = BytesMut::with_capacity(data.len() + 32);
    let mut offset = 0;
    let mut last_offset = 0;

    while offset < data.len() {
        if data[offset] == 0x00 {
            if let Some(pattern_size) = start_code_size(&data[offset..]) {
                // A completed NAL unit sits between the previous start code
                // and this one.
                if last_offset < offset {
                    let nalu = &data[last_offset..offset];
                    avcc.put_u32(nalu.len() as u32);
                    avcc.put_slice(nalu);
                }

                offset += pattern_size;
                last_offset = offset;
                continue;
            }
        }

        offset += 1;
    }

    // The final NAL unit has no trailing start code.
    if last_offset < offset {
        let nalu = &data[last_offset..offset];
        avcc.put_u32(nalu.len() as u32);
        avcc.put_slice(nalu);
    }

    avcc.freeze()
}
