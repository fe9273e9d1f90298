use nutype_enum::nutype_enum;

nutype_enum! {
    /// AVC packet type tag, as carried by FLV/RTMP-style video tags.
    ///
    /// Tells the in-place converter whether a packet body is a decoder
    /// configuration record (sequence header) or length-prefixed NAL units.
    ///
    /// Defined by:
    /// - Legacy FLV spec, Annex E.4.3.1
    pub enum AvcPacketType(u8) {
        /// AVC sequence header
        SeqHdr = 0,
        /// AVC NALU
        Nalu = 1,
        /// AVC end of sequence
        EndOfSequence = 2
    }
}
