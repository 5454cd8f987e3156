use std::path::PathBuf;

use image::RgbaImage;
use qrcode::{QrCode, Version};
use tracing::debug;

use crate::color::Rgb;
use crate::error::{QrError, QrResult};
use crate::render::{embed_image, render_symbol};
use crate::style::{ColorMask, EcLevel, MAX_VERSION, MaskKind, ModuleDrawer, VersionChoice};

pub const DEFAULT_DATA: &str = "https://example.com";
pub const DEFAULT_BOX_SIZE: u32 = 10;
pub const DEFAULT_BORDER: u32 = 4;

/// Everything a front-end collects before asking for an image.
#[derive(Debug, Clone)]
pub struct QrOptions {
    pub data: String,
    pub version: VersionChoice,
    pub ec_level: EcLevel,
    pub box_size: u32,
    pub border: u32,
    pub fill: Rgb,
    pub back: Rgb,
    pub gradient: Option<Rgb>,
    pub drawer: ModuleDrawer,
    pub mask: MaskKind,
    pub embedded_image: Option<PathBuf>,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            data: DEFAULT_DATA.to_string(),
            version: VersionChoice::Auto,
            ec_level: EcLevel::M,
            box_size: DEFAULT_BOX_SIZE,
            border: DEFAULT_BORDER,
            fill: Rgb::BLACK,
            back: Rgb::WHITE,
            gradient: None,
            drawer: ModuleDrawer::Square,
            mask: MaskKind::Solid,
            embedded_image: None,
        }
    }
}

impl QrOptions {
    pub fn color_mask(&self) -> ColorMask {
        ColorMask::new(self.mask, self.fill, self.back, self.gradient)
    }
}

/// Encodes `data` at the smallest version that fits. A fixed version is a
/// starting point, not a cap.
pub fn fit_symbol(data: &str, version: VersionChoice, ec_level: EcLevel) -> QrResult<QrCode> {
    let start = match version {
        VersionChoice::Auto => {
            return Ok(QrCode::with_error_correction_level(data.as_bytes(), ec_level.into())?);
        }
        VersionChoice::Fixed(v) => v,
    };

    for v in start..=MAX_VERSION {
        match QrCode::with_version(data.as_bytes(), Version::Normal(v), ec_level.into()) {
            Ok(code) => return Ok(code),
            Err(qrcode::types::QrError::DataTooLong) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(QrError::DataTooLong)
}

pub fn build_qr(options: &QrOptions) -> QrResult<RgbaImage> {
    if options.box_size == 0 {
        return Err(QrError::InvalidBoxSize(options.box_size));
    }
    if options.embedded_image.is_some() && options.ec_level != EcLevel::H {
        return Err(QrError::EmbeddedImageNeedsHighEc);
    }

    let code = fit_symbol(&options.data, options.version, options.ec_level)?;
    debug!(
        version = ?code.version(),
        modules = code.width(),
        drawer = options.drawer.id(),
        mask = options.mask.id(),
        "symbol fitted"
    );

    let mut image = render_symbol(
        &code,
        options.box_size,
        options.border,
        options.drawer,
        &options.color_mask(),
    )?;

    if let Some(path) = &options.embedded_image {
        let logo = image::io::Reader::open(path)?.with_guessed_format()?.decode()?;
        embed_image(&mut image, &logo, options.box_size);
    }

    Ok(image)
}
