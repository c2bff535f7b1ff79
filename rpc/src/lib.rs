//! Application layer protocol for the image training service.
//!
//! Frames are a big-endian `u64` length prefix followed by the encoded
//! message. Structured payloads travel as JSON; image bodies ride as a
//! zero-copy tail after the frame header.

mod deserialize;
pub mod msg;
mod receiver;
mod sender;
mod serialize;

use tokio::io::{AsyncRead, AsyncWrite};

pub use deserialize::Deserialize;
pub use receiver::RpcReceiver;
pub use sender::RpcSender;
pub use serialize::Serialize;

type LenType = u64;
const LEN_TYPE_SIZE: usize = size_of::<LenType>();

/// Creates both `RpcReceiver` and `RpcSender` channel halves.
///
/// # Arguments
/// * `rx` - An async readable.
/// * `tx` - An async writable.
///
/// # Returns
/// Both ends of the communication as a receiver and sender pair.
pub fn channel<R, W>(rx: R, tx: W) -> (RpcReceiver<R>, RpcSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (RpcReceiver::new(rx), RpcSender::new(tx))
}
