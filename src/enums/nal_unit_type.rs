use nutype_enum::nutype_enum;

nutype_enum! {
    /// NAL (Network Abstraction Layer) unit types as defined by
    /// ISO/IEC 14496-10 (Table 7-1).
    ///
    /// The type lives in the low 5 bits of the first NAL unit byte. The
    /// converter only branches on [`NalUnitType::IdrSlice`]; the rest are
    /// carried through untouched so callers can classify whatever they
    /// extract.
    pub enum NalUnitType(u8) {
        /// Unspecified, not used in decoding
        Unspecified = 0,

        /// Coded slice of a non-IDR picture
        NonIdrSlice = 1,

        /// Coded slice data partition A
        DataPartitionA = 2,

        /// Coded slice data partition B
        DataPartitionB = 3,

        /// Coded slice data partition C
        DataPartitionC = 4,

        /// Coded slice of an IDR picture (keyframe; decoding can restart here)
        IdrSlice = 5,

        /// Supplemental Enhancement Information
        Sei = 6,

        /// Sequence Parameter Set
        Sps = 7,

        /// Picture Parameter Set
        Pps = 8,

        /// Access Unit Delimiter
        AccessUnitDelimiter = 9,

        /// End of sequence
        EndOfSequence = 10,

        /// End of stream
        EndOfStream = 11,

        /// Filler data
        FillerData = 12,

        /// Sequence Parameter Set extension
        SpsExtension = 13,

        /// Prefix NAL unit (SVC/MVC)
        PrefixNalUnit = 14,

        /// Subset Sequence Parameter Set (SVC/MVC)
        SubsetSps = 15,

        /// Depth Parameter Set
        DepthParameterSet = 16,

        /// Coded slice of an auxiliary coded picture
        AuxSlice = 19,

        /// Coded slice extension (SVC/MVC)
        SliceExtension = 20,

        /// Coded slice extension for depth/3D-AVC
        SliceExtensionDepth = 21
    }
}

impl NalUnitType {
    /// Returns true if this is an IDR slice (type 5).
    pub const fn is_idr(self) -> bool {
        self.0 == NalUnitType::IdrSlice.0
    }
}
