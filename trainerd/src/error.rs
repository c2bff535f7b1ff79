use std::{error::Error, fmt, io};

/// The service's result type.
pub type Result<T> = std::result::Result<T, ServiceErr>;

/// Service failure kinds. Every failure aborts the current call.
#[derive(Debug)]
pub enum ServiceErr {
    /// `acceptImage` was called without an image body.
    MissingImage,
    /// The image bytes failed codec verification.
    InvalidImage(String),
    /// The external training subprocess exited non-zero.
    TrainingFailed { status: Option<i32> },
    /// Broken startup configuration or an unreadable state blob.
    InvalidConfig(String),
    Io(io::Error),
}

impl fmt::Display for ServiceErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingImage => write!(f, "an image is required"),
            Self::InvalidImage(reason) => write!(f, "invalid image: {reason}"),
            Self::TrainingFailed { status: Some(code) } => {
                write!(f, "model training failed with exit code {code}")
            }
            Self::TrainingFailed { status: None } => {
                write!(f, "model training was terminated by a signal")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for ServiceErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ServiceErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<ServiceErr> for io::Error {
    fn from(value: ServiceErr) -> Self {
        match value {
            ServiceErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
