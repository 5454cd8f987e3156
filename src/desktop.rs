//! State behind the desktop form: the field values as the user typed them,
//! plus the most recently generated image.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use qrcode::render::unicode;

use crate::builder::{DEFAULT_BORDER, DEFAULT_BOX_SIZE, DEFAULT_DATA, QrOptions, build_qr, fit_symbol};
use crate::color::Rgb;
use crate::error::{QrError, QrResult};
use crate::output::{PREVIEW_SIDE, preview, save_as};
use crate::style::{EcLevel, MaskKind, ModuleDrawer};

pub const BOX_SIZE_RANGE: (u32, u32) = (1, 100);
pub const BORDER_RANGE: (u32, u32) = (0, 100);

#[derive(Debug, Clone)]
pub struct DesktopForm {
    pub data: String,
    pub version: String,
    pub ec_level: EcLevel,
    pub box_size: u32,
    pub border: u32,
    pub fill_color: String,
    pub back_color: String,
    pub gradient_color: Option<String>,
    pub module_drawer: String,
    pub color_mask: String,
    pub embedded_image: Option<PathBuf>,
    image: Option<RgbaImage>,
}

impl Default for DesktopForm {
    fn default() -> Self {
        Self {
            data: DEFAULT_DATA.to_string(),
            version: "Auto".to_string(),
            ec_level: EcLevel::M,
            box_size: DEFAULT_BOX_SIZE,
            border: DEFAULT_BORDER,
            fill_color: Rgb::BLACK.to_hex(),
            back_color: Rgb::WHITE.to_hex(),
            gradient_color: None,
            module_drawer: "Square".to_string(),
            color_mask: "Solid".to_string(),
            embedded_image: None,
            image: None,
        }
    }
}

impl DesktopForm {
    pub fn options(&self) -> QrResult<QrOptions> {
        if self.data.is_empty() {
            return Err(QrError::EmptyData);
        }
        Ok(QrOptions {
            data: self.data.clone(),
            version: self.version.parse()?,
            ec_level: self.ec_level,
            box_size: self.box_size.clamp(BOX_SIZE_RANGE.0, BOX_SIZE_RANGE.1),
            border: self.border.clamp(BORDER_RANGE.0, BORDER_RANGE.1),
            fill: Rgb::parse_hex(&self.fill_color)?,
            back: Rgb::parse_hex(&self.back_color)?,
            gradient: self.gradient_color.as_deref().map(Rgb::parse_hex).transpose()?,
            drawer: ModuleDrawer::lookup(&self.module_drawer),
            mask: MaskKind::lookup(&self.color_mask),
            embedded_image: self.embedded_image.clone(),
        })
    }

    /// Builds a new image. On failure the previous image is kept.
    pub fn generate(&mut self) -> QrResult<&RgbaImage> {
        let image = build_qr(&self.options()?)?;
        Ok(self.image.insert(image))
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<RgbaImage> {
        self.image.as_ref().map(|img| preview(img, PREVIEW_SIDE))
    }

    /// The symbol as terminal text, ignoring styling.
    pub fn text_preview(&self) -> QrResult<String> {
        let options = self.options()?;
        let code = fit_symbol(&options.data, options.version, options.ec_level)?;
        Ok(code
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .quiet_zone(options.border > 0)
            .build())
    }

    pub fn save(&self, path: &Path) -> QrResult<()> {
        let image = self.image.as_ref().ok_or(QrError::NothingGenerated)?;
        save_as(image, path)
    }

    pub fn clear_embedded_image(&mut self) {
        self.embedded_image = None;
    }

    pub fn embedded_image_label(&self) -> String {
        self.embedded_image
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No image selected".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_is_refused() {
        let mut form = DesktopForm { data: String::new(), ..DesktopForm::default() };
        assert!(matches!(form.generate(), Err(QrError::EmptyData)));
        assert!(form.image().is_none());
    }

    #[test]
    fn save_without_image_fails() {
        let form = DesktopForm::default();
        let path = std::env::temp_dir().join("qrstudio-never-written.png");
        assert!(matches!(form.save(&path), Err(QrError::NothingGenerated)));
    }

    #[test]
    fn labels_map_to_styles() {
        let form = DesktopForm {
            module_drawer: "Vertical Bars".to_string(),
            color_mask: "Square Gradient".to_string(),
            ..DesktopForm::default()
        };
        let options = form.options().unwrap();
        assert_eq!(options.drawer.id(), "vertical_bars");
        assert_eq!(options.mask, MaskKind::SquareGradient);
    }

    #[test]
    fn spin_box_limits_apply() {
        let form = DesktopForm { box_size: 0, border: 500, ..DesktopForm::default() };
        let options = form.options().unwrap();
        assert_eq!(options.box_size, 1);
        assert_eq!(options.border, 100);
    }

    #[test]
    fn failed_generate_keeps_previous_image() {
        let mut form = DesktopForm::default();
        let first = form.generate().unwrap().clone();
        form.version = "99".to_string();
        assert!(form.generate().is_err());
        assert_eq!(form.image(), Some(&first));
    }

    #[test]
    fn preview_is_capped() {
        let mut form = DesktopForm { box_size: 30, ..DesktopForm::default() };
        form.generate().unwrap();
        let preview = form.preview().unwrap();
        assert_eq!(preview.width(), PREVIEW_SIDE);
        assert_eq!(form.image().unwrap().width(), 990);
    }

    #[test]
    fn embedded_label() {
        let mut form = DesktopForm {
            embedded_image: Some(PathBuf::from("/some/where/logo.png")),
            ..DesktopForm::default()
        };
        assert_eq!(form.embedded_image_label(), "logo.png");
        form.clear_embedded_image();
        assert_eq!(form.embedded_image_label(), "No image selected");
    }

    #[test]
    fn text_preview_has_rows() {
        let text = DesktopForm::default().text_preview().unwrap();
        assert!(text.lines().count() > 10);
    }
}
