/// Objects that can be framed onto the wire.
pub trait Serialize<'a> {
    /// Appends the encoded form of `self` to `buf`.
    ///
    /// Large binary payloads may instead be returned as a borrowed
    /// tail, which the sender writes after `buf` without copying.
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]>;
}
