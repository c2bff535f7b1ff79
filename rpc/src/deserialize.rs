use std::io;

/// Objects that can be decoded from a received frame.
pub trait Deserialize<'a>: Sized {
    /// Decodes a value from `buf`; the result may borrow from it.
    fn deserialize(buf: &'a [u8]) -> io::Result<Self>;
}
