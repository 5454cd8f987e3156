//! Styled QR code generation behind a web form and a desktop form.
//!
//! Symbol encoding is left to the `qrcode` crate and pixel work to `image`
//! and `imageproc`; this crate maps form fields onto them and keeps track of
//! the generated files.

pub mod builder;
pub mod color;
pub mod config;
pub mod desktop;
pub mod error;
pub mod output;
pub mod render;
pub mod server;
pub mod store;
pub mod style;

pub use builder::{QrOptions, build_qr, fit_symbol};
pub use color::Rgb;
pub use config::ServerConfig;
pub use desktop::DesktopForm;
pub use error::{QrError, QrResult};
pub use store::{Artifact, ArtifactStore};
pub use style::{ColorMask, EcLevel, MaskKind, ModuleDrawer, VersionChoice};
