use std::{error::Error, fmt, io::Cursor};

use image::{DynamicImage, ImageFormat, ImageReader};

/// The single on-disk encoding for every image the service touches.
pub const STANDARD_FORMAT: ImageFormat = ImageFormat::Jpeg;

/// Filename suffix carried by standard-format files.
pub const STANDARD_SUFFIX: &str = ".JPEG";

/// Reason a codec rejected an image.
#[derive(Debug)]
pub struct CodecErr(String);

impl CodecErr {
    fn new(reason: impl fmt::Display) -> Self {
        Self(reason.to_string())
    }
}

impl fmt::Display for CodecErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for CodecErr {}

/// Image verification and transcoding seam.
///
/// The orchestrator never touches pixel data itself; concrete adapters
/// provide the capability set it needs: validate raw bytes and
/// re-encode them into the standard format.
pub trait ImageCodec: Send + Sync {
    /// Returns `Ok` only if `bytes` decode as a supported image.
    fn validate(&self, bytes: &[u8]) -> Result<(), CodecErr>;

    /// Re-encodes `bytes` into the standard format.
    fn transcode(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecErr>;
}

/// Codec adapter over the `image` crate, standardizing on JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl JpegCodec {
    fn decode(bytes: &[u8]) -> Result<DynamicImage, CodecErr> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(CodecErr::new)?
            .decode()
            .map_err(CodecErr::new)
    }
}

impl ImageCodec for JpegCodec {
    fn validate(&self, bytes: &[u8]) -> Result<(), CodecErr> {
        Self::decode(bytes).map(|_| ())
    }

    fn transcode(&self, bytes: &[u8]) -> Result<Vec<u8>, CodecErr> {
        let img = Self::decode(bytes)?;

        // JPEG carries no alpha channel.
        let img = DynamicImage::ImageRgb8(img.to_rgb8());

        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, STANDARD_FORMAT).map_err(CodecErr::new)?;
        Ok(out.into_inner())
    }
}
