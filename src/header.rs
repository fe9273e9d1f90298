//! NAL unit header functionality.

use crate::enums::NalUnitType;
use crate::error::H264ConverterError;

/// A parsed NAL unit header.
///
/// H.264 NAL unit headers are a single byte:
/// `forbidden_zero_bit (1) | nal_ref_idc (2) | nal_unit_type (5)`.
/// The SVC/MVC extension bytes that follow for types 14/20/21 are not
/// needed for reframing and are not parsed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalUnitHeader {
    /// Importance of this NAL unit for reconstruction (0 means disposable).
    pub nal_ref_idc: u8,
    /// The NAL unit type from the low 5 bits.
    pub nal_unit_type: NalUnitType,
}

impl NalUnitHeader {
    /// Parses the header from the first byte of a NAL unit payload.
    pub fn parse(data: &[u8]) -> Result<Self, H264ConverterError> {
        let first_byte = *data.first().ok_or(H264ConverterError::IncompleteNalHeader)?;

        if first_byte & 0b1000_0000 != 0 {
            return Err(H264ConverterError::ForbiddenZeroBit);
        }

        Ok(Self {
            nal_ref_idc: (first_byte >> 5) & 0b11,
            nal_unit_type: NalUnitType::from(first_byte & 0b0001_1111),
        })
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use crate::enums::NalUnitType;
    use crate::error::H264ConverterError;
    use crate::header::NalUnitHeader;

    #[test]
    fn test_parse_idr_header() {
        // 0x65 = ref_idc 3, type 5
        let header = NalUnitHeader::parse(&[0x65, 0x88, 0x84]).unwrap();

        assert_eq!(header.nal_ref_idc, 3);
        assert_eq!(header.nal_unit_type, NalUnitType::IdrSlice);
        assert!(header.nal_unit_type.is_idr());
    }

    #[test]
    fn test_parse_non_idr_header() {
        // 0x41 = ref_idc 2, type 1
        let header = NalUnitHeader::parse(&[0x41]).unwrap();

        assert_eq!(header.nal_ref_idc, 2);
        assert_eq!(header.nal_unit_type, NalUnitType::NonIdrSlice);
        assert!(!header.nal_unit_type.is_idr());
    }

    #[test]
    fn test_parse_forbidden_zero_bit() {
        let err = NalUnitHeader::parse(&[0xE5]).unwrap_err();
        assert!(matches!(err, H264ConverterError::ForbiddenZeroBit));
    }

    #[test]
    fn test_parse_empty_payload() {
        let err = NalUnitHeader::parse(&[]).unwrap_err();
        assert!(matches!(err, H264ConverterError::IncompleteNalHeader));
    }
}
