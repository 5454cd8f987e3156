use std::fmt::{Debug, Display, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug)]
pub enum QrError {
    // Form input
    EmptyData,
    InvalidColor(String),
    InvalidVersion(String),
    InvalidEcLevel(String),
    InvalidBoxSize(u32),
    InvalidField { field: &'static str, value: String },

    // Generation
    DataTooLong,
    Encode(qrcode::types::QrError),
    EmbeddedImageNeedsHighEc,
    ImageTooLarge { modules: usize, box_size: u32, border: u32 },
    Image(image::ImageError),
    UnsupportedFormat(String),

    // Desktop form
    NothingGenerated,

    Io(std::io::Error),
}

impl Display for QrError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::EmptyData => f.write_str("Please enter data for the QR code"),
            Self::InvalidColor(c) => write!(f, "invalid color '{c}', expected #RRGGBB"),
            Self::InvalidVersion(v) => write!(f, "Invalid version (was {v}, expected 1 to 40)"),
            Self::InvalidEcLevel(l) => write!(f, "invalid error correction level '{l}'"),
            Self::InvalidBoxSize(s) => write!(f, "Invalid box size (was {s}, expected larger than 0)"),
            Self::InvalidField { field, value } => write!(f, "invalid value '{value}' for {field}"),
            Self::DataTooLong => f.write_str("data too long for any QR version"),
            Self::Encode(e) => write!(f, "QR encode error: {e}"),
            Self::EmbeddedImageNeedsHighEc => {
                f.write_str("Error correction level must be H if an embedded image is provided")
            }
            Self::ImageTooLarge { modules, box_size, border } => write!(
                f,
                "Image too large ({modules} modules with border {border} at box size {box_size})"
            ),
            Self::Image(e) => write!(f, "image error: {e}"),
            Self::UnsupportedFormat(ext) => write!(f, "unsupported output format '{ext}'"),
            Self::NothingGenerated => f.write_str("No QR code has been generated"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for QrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<qrcode::types::QrError> for QrError {
    fn from(e: qrcode::types::QrError) -> Self {
        match e {
            qrcode::types::QrError::DataTooLong => Self::DataTooLong,
            other => Self::Encode(other),
        }
    }
}

impl From<image::ImageError> for QrError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<std::io::Error> for QrError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type QrResult<T> = Result<T, QrError>;
