use std::{borrow::Cow, io};

use crate::{Deserialize, Serialize};

type Header = u32;
const HEADER_SIZE: usize = size_of::<Header>();

type MethodLen = u32;
const METHOD_LEN_SIZE: usize = size_of::<MethodLen>();

/// Typed failure kinds a call can come back with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultCode {
    MissingImage,
    InvalidImage,
    TrainingFailed,
    UnknownMethod,
    Internal,
}

/// The failure reply payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fault {
    pub code: FaultCode,
    pub detail: String,
}

/// The command for the `Control` variant of the `Msg` enum.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Disconnect,
}

/// The application layer message for the entire service.
#[derive(Debug)]
pub enum Msg<'a> {
    /// Method invocation: a method name plus the raw request body.
    /// An empty body means the method was called with no argument.
    Call { method: Cow<'a, str>, body: &'a [u8] },
    /// Empty success reply.
    Ok,
    /// Typed failure reply.
    Fault(Fault),
    Control(Command),
}

impl Msg<'_> {
    fn buf_is_too_small<T>(size: usize, needed: usize) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("The given buffer is too small {size}, must at least be {needed} bytes"),
        ))
    }

    fn invalid_kind_byte<T>(byte: u8) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Received an invalid kind byte {byte}"),
        ))
    }
}

impl<'a> Serialize<'a> for Msg<'a> {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        match self {
            Msg::Fault(fault) => {
                let header = (0 as Header).to_be_bytes();
                buf.extend_from_slice(&header);

                // SAFETY: Serialize impl for `Fault` is derived and not
                //         implemented by hand. Nor has a non string-key
                //         map inside.
                serde_json::to_writer(buf, &fault).unwrap();
                None
            }
            Msg::Control(cmd) => {
                let header = (1 as Header).to_be_bytes();
                buf.extend_from_slice(&header);

                // SAFETY: Same as the `Fault` arm above.
                serde_json::to_writer(buf, &cmd).unwrap();
                None
            }
            Msg::Call { method, body } => {
                let header = (2 as Header).to_be_bytes();
                buf.extend_from_slice(&header);

                let method_len = (method.len() as MethodLen).to_be_bytes();
                buf.extend_from_slice(&method_len);
                buf.extend_from_slice(method.as_bytes());
                Some(body)
            }
            Msg::Ok => {
                let header = (3 as Header).to_be_bytes();
                buf.extend_from_slice(&header);
                None
            }
        }
    }
}

impl<'a> Deserialize<'a> for Msg<'a> {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Self::buf_is_too_small(buf.len(), HEADER_SIZE);
        }

        let (kind_buf, rest) = buf.split_at(HEADER_SIZE);

        // SAFETY: We splitted the buffer to be of size `HEADER_SIZE` just above.
        let kind = Header::from_be_bytes(kind_buf.try_into().unwrap()) as u8;

        match kind {
            0 => {
                let fault = serde_json::from_slice(rest)?;
                Ok(Self::Fault(fault))
            }
            1 => {
                let cmd = serde_json::from_slice(rest)?;
                Ok(Self::Control(cmd))
            }
            2 => {
                if rest.len() < METHOD_LEN_SIZE {
                    return Self::buf_is_too_small(rest.len(), METHOD_LEN_SIZE);
                }

                let (len_buf, rest) = rest.split_at(METHOD_LEN_SIZE);

                // SAFETY: We splitted the buffer to be of size `METHOD_LEN_SIZE` just above.
                let method_len = MethodLen::from_be_bytes(len_buf.try_into().unwrap()) as usize;

                if rest.len() < method_len {
                    return Self::buf_is_too_small(rest.len(), method_len);
                }

                let (method, body) = rest.split_at(method_len);
                let method = str::from_utf8(method)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

                Ok(Self::Call {
                    method: Cow::Borrowed(method),
                    body,
                })
            }
            3 => Ok(Self::Ok),
            byte => Self::invalid_kind_byte(byte),
        }
    }
}
