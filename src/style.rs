//! Mapping from form field values to typed style choices.
//!
//! Every choice can be looked up two ways: by the identifier the web form
//! posts (`gapped_square`) and by the label the desktop form shows
//! (`Gapped Square`). Lookups are lenient and fall back to the default
//! variant; `FromStr` is strict.

use std::str::FromStr;

use crate::color::Rgb;
use crate::error::QrError;

pub const MIN_VERSION: i16 = 1;
pub const MAX_VERSION: i16 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl EcLevel {
    pub const ALL: [EcLevel; 4] = [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H];

    /// Unknown letters fall back to M.
    pub fn lookup(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            EcLevel::L => "L - Low (7%)",
            EcLevel::M => "M - Medium (15%)",
            EcLevel::Q => "Q - Quartile (25%)",
            EcLevel::H => "H - High (30%)",
        }
    }
}

impl FromStr for EcLevel {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(EcLevel::L),
            "M" | "m" => Ok(EcLevel::M),
            "Q" | "q" => Ok(EcLevel::Q),
            "H" | "h" => Ok(EcLevel::H),
            other => Err(QrError::InvalidEcLevel(other.to_string())),
        }
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Symbol version. A fixed version is the smallest one tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionChoice {
    #[default]
    Auto,
    Fixed(i16),
}

impl VersionChoice {
    pub fn fixed(version: i16) -> Result<Self, QrError> {
        if (MIN_VERSION..=MAX_VERSION).contains(&version) {
            Ok(VersionChoice::Fixed(version))
        } else {
            Err(QrError::InvalidVersion(version.to_string()))
        }
    }
}

impl FromStr for VersionChoice {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(VersionChoice::Auto);
        }
        let version: i16 = s.parse().map_err(|_| QrError::InvalidVersion(s.to_string()))?;
        VersionChoice::fixed(version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ModuleDrawer {
    #[default]
    Square,
    GappedSquare { size_ratio: f32 },
    Circle,
    Rounded,
    VerticalBars { horizontal_shrink: f32 },
    HorizontalBars { vertical_shrink: f32 },
}

impl ModuleDrawer {
    pub const GAP_RATIO: f32 = 0.8;
    pub const BAR_SHRINK: f32 = 0.8;

    pub const LABELS: [&'static str; 6] = [
        "Square",
        "Gapped Square",
        "Circle",
        "Rounded",
        "Vertical Bars",
        "Horizontal Bars",
    ];

    /// Accepts a web id or a desktop label; unknown names give Square.
    pub fn lookup(name: &str) -> Self {
        match normalize(name).as_str() {
            "gapped_square" => ModuleDrawer::GappedSquare { size_ratio: Self::GAP_RATIO },
            "circle" => ModuleDrawer::Circle,
            "rounded" => ModuleDrawer::Rounded,
            "vertical_bars" => ModuleDrawer::VerticalBars { horizontal_shrink: Self::BAR_SHRINK },
            "horizontal_bars" => ModuleDrawer::HorizontalBars { vertical_shrink: Self::BAR_SHRINK },
            _ => ModuleDrawer::Square,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ModuleDrawer::Square => "square",
            ModuleDrawer::GappedSquare { .. } => "gapped_square",
            ModuleDrawer::Circle => "circle",
            ModuleDrawer::Rounded => "rounded",
            ModuleDrawer::VerticalBars { .. } => "vertical_bars",
            ModuleDrawer::HorizontalBars { .. } => "horizontal_bars",
        }
    }

    /// Square edges line up with pixels and need no antialiasing.
    pub fn needs_antialiasing(&self) -> bool {
        !matches!(self, ModuleDrawer::Square)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskKind {
    #[default]
    Solid,
    RadialGradient,
    SquareGradient,
    HorizontalGradient,
    VerticalGradient,
}

impl MaskKind {
    pub const LABELS: [&'static str; 5] = [
        "Solid",
        "Radial Gradient",
        "Square Gradient",
        "Horizontal Gradient",
        "Vertical Gradient",
    ];

    /// Accepts a web id or a desktop label; unknown names give Solid.
    pub fn lookup(name: &str) -> Self {
        match normalize(name).as_str() {
            "radial_gradient" => MaskKind::RadialGradient,
            "square_gradient" => MaskKind::SquareGradient,
            "horizontal_gradient" => MaskKind::HorizontalGradient,
            "vertical_gradient" => MaskKind::VerticalGradient,
            _ => MaskKind::Solid,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            MaskKind::Solid => "solid",
            MaskKind::RadialGradient => "radial_gradient",
            MaskKind::SquareGradient => "square_gradient",
            MaskKind::HorizontalGradient => "horizontal_gradient",
            MaskKind::VerticalGradient => "vertical_gradient",
        }
    }

    /// Labels for the fill color and the gradient end color inputs.
    pub fn color_labels(self) -> (&'static str, Option<&'static str>) {
        match self {
            MaskKind::Solid => ("Fill Color", None),
            MaskKind::RadialGradient | MaskKind::SquareGradient => {
                ("Center Color", Some("Edge Color"))
            }
            MaskKind::HorizontalGradient => ("Left Color", Some("Right Color")),
            MaskKind::VerticalGradient => ("Top Color", Some("Bottom Color")),
        }
    }
}

/// How module pixels are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMask {
    Solid { front: Rgb, back: Rgb },
    RadialGradient { back: Rgb, center: Rgb, edge: Rgb },
    SquareGradient { back: Rgb, center: Rgb, edge: Rgb },
    HorizontalGradient { back: Rgb, left: Rgb, right: Rgb },
    VerticalGradient { back: Rgb, top: Rgb, bottom: Rgb },
}

impl Default for ColorMask {
    fn default() -> Self {
        ColorMask::Solid { front: Rgb::BLACK, back: Rgb::WHITE }
    }
}

impl ColorMask {
    /// Gradient end color used when the form leaves it out.
    pub const DEFAULT_GRADIENT_END: Rgb = Rgb::BLUE;

    pub fn new(kind: MaskKind, fill: Rgb, back: Rgb, gradient: Option<Rgb>) -> Self {
        let end = gradient.unwrap_or(Self::DEFAULT_GRADIENT_END);
        match kind {
            MaskKind::Solid => ColorMask::Solid { front: fill, back },
            MaskKind::RadialGradient => ColorMask::RadialGradient { back, center: fill, edge: end },
            MaskKind::SquareGradient => ColorMask::SquareGradient { back, center: fill, edge: end },
            MaskKind::HorizontalGradient => {
                ColorMask::HorizontalGradient { back, left: fill, right: end }
            }
            MaskKind::VerticalGradient => ColorMask::VerticalGradient { back, top: fill, bottom: end },
        }
    }

    pub fn back(&self) -> Rgb {
        match *self {
            ColorMask::Solid { back, .. }
            | ColorMask::RadialGradient { back, .. }
            | ColorMask::SquareGradient { back, .. }
            | ColorMask::HorizontalGradient { back, .. }
            | ColorMask::VerticalGradient { back, .. } => back,
        }
    }

    /// Module color at pixel `(x, y)` of a `width` x `height` image.
    pub fn front_at(&self, x: u32, y: u32, width: u32, height: u32) -> Rgb {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let (fx, fy) = (x as f32, y as f32);
        match *self {
            ColorMask::Solid { front, .. } => front,
            ColorMask::RadialGradient { center, edge, .. } => {
                let (dx, dy) = (fx - w / 2.0, fy - h / 2.0);
                let max = std::f32::consts::SQRT_2 * w / 2.0;
                Rgb::lerp(center, edge, (dx * dx + dy * dy).sqrt() / max)
            }
            ColorMask::SquareGradient { center, edge, .. } => {
                let d = (fx - w / 2.0).abs().max((fy - h / 2.0).abs());
                Rgb::lerp(center, edge, d / (w / 2.0))
            }
            ColorMask::HorizontalGradient { left, right, .. } => Rgb::lerp(left, right, fx / w),
            ColorMask::VerticalGradient { top, bottom, .. } => Rgb::lerp(top, bottom, fy / h),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ec_lookup_falls_back_to_medium() {
        assert_eq!(EcLevel::lookup("H"), EcLevel::H);
        assert_eq!(EcLevel::lookup("X"), EcLevel::M);
        assert!("X".parse::<EcLevel>().is_err());
    }

    #[test]
    fn version_parsing() {
        assert_eq!("auto".parse::<VersionChoice>().unwrap(), VersionChoice::Auto);
        assert_eq!("Auto".parse::<VersionChoice>().unwrap(), VersionChoice::Auto);
        assert_eq!("7".parse::<VersionChoice>().unwrap(), VersionChoice::Fixed(7));
        assert!(matches!("0".parse::<VersionChoice>(), Err(QrError::InvalidVersion(_))));
        assert!(matches!("41".parse::<VersionChoice>(), Err(QrError::InvalidVersion(_))));
        assert!(matches!("seven".parse::<VersionChoice>(), Err(QrError::InvalidVersion(_))));
    }

    #[test]
    fn drawers_resolve_from_ids_and_labels() {
        assert_eq!(ModuleDrawer::lookup("gapped_square"), ModuleDrawer::lookup("Gapped Square"));
        assert_eq!(ModuleDrawer::lookup("Vertical Bars").id(), "vertical_bars");
        assert_eq!(ModuleDrawer::lookup("hexagon"), ModuleDrawer::Square);
        for label in ModuleDrawer::LABELS {
            assert_eq!(normalize(label), ModuleDrawer::lookup(label).id());
        }
    }

    #[test]
    fn masks_resolve_from_ids_and_labels() {
        assert_eq!(MaskKind::lookup("Radial Gradient"), MaskKind::RadialGradient);
        assert_eq!(MaskKind::lookup("vertical_gradient"), MaskKind::VerticalGradient);
        assert_eq!(MaskKind::lookup("plaid"), MaskKind::Solid);
        for label in MaskKind::LABELS {
            assert_eq!(normalize(label), MaskKind::lookup(label).id());
        }
    }

    #[test]
    fn gradient_end_defaults_to_blue() {
        let mask = ColorMask::new(MaskKind::HorizontalGradient, Rgb::BLACK, Rgb::WHITE, None);
        assert_eq!(
            mask,
            ColorMask::HorizontalGradient { back: Rgb::WHITE, left: Rgb::BLACK, right: Rgb::BLUE }
        );
    }

    #[test]
    fn gradients_run_from_fill_to_end() {
        let red = Rgb(255, 0, 0);
        let mask = ColorMask::new(MaskKind::VerticalGradient, red, Rgb::WHITE, Some(Rgb::BLACK));
        assert_eq!(mask.front_at(5, 0, 100, 100), red);
        assert_eq!(mask.front_at(5, 100, 100, 100), Rgb::BLACK);

        let radial = ColorMask::new(MaskKind::RadialGradient, red, Rgb::WHITE, None);
        assert_eq!(radial.front_at(50, 50, 100, 100), red);
        assert_eq!(radial.front_at(0, 0, 100, 100), Rgb::BLUE);

        let square = ColorMask::new(MaskKind::SquareGradient, red, Rgb::WHITE, None);
        assert_eq!(square.front_at(0, 50, 100, 100), Rgb::BLUE);
    }

    #[test]
    fn solid_ignores_position() {
        let mask = ColorMask::default();
        assert_eq!(mask.front_at(0, 0, 10, 10), mask.front_at(9, 9, 10, 10));
        assert_eq!(mask.back(), Rgb::WHITE);
    }
}
