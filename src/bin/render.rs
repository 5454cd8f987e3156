use std::path::PathBuf;

use clap::Parser;
use qrstudio::style::{EcLevel, MaskKind, ModuleDrawer, VersionChoice};
use qrstudio::{QrOptions, Rgb, build_qr};
use tracing_subscriber::EnvFilter;

/// Render one styled QR code to a file.
#[derive(Parser, Debug)]
#[command(name = "qrstudio-render")]
struct Args {
    /// Text or URL to encode
    data: String,

    /// Output file; the extension picks the format (png, jpg, bmp)
    #[arg(short, long, default_value = "qrcode.png")]
    output: PathBuf,

    /// Symbol version, "auto" or 1-40
    #[arg(long, default_value = "auto")]
    version: VersionChoice,

    /// Error correction level: L, M, Q or H
    #[arg(short, long, default_value = "M")]
    error_correction: EcLevel,

    /// Pixels per module
    #[arg(long, default_value_t = 10)]
    box_size: u32,

    /// Quiet zone width in modules
    #[arg(long, default_value_t = 4)]
    border: u32,

    #[arg(long, default_value = "#000000")]
    fill_color: String,

    #[arg(long, default_value = "#ffffff")]
    back_color: String,

    /// End color of gradient styles
    #[arg(long)]
    gradient_color: Option<String>,

    /// square, gapped_square, circle, rounded, vertical_bars, horizontal_bars
    #[arg(long, default_value = "square")]
    module_drawer: String,

    /// solid, radial_gradient, square_gradient, horizontal_gradient, vertical_gradient
    #[arg(long, default_value = "solid")]
    color_mask: String,

    /// Image to place in the middle (needs -e H)
    #[arg(long)]
    embedded_image: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let options = QrOptions {
        data: args.data,
        version: args.version,
        ec_level: args.error_correction,
        box_size: args.box_size,
        border: args.border,
        fill: Rgb::parse_hex(&args.fill_color)?,
        back: Rgb::parse_hex(&args.back_color)?,
        gradient: args.gradient_color.as_deref().map(Rgb::parse_hex).transpose()?,
        drawer: ModuleDrawer::lookup(&args.module_drawer),
        mask: MaskKind::lookup(&args.color_mask),
        embedded_image: args.embedded_image,
    };

    let image = build_qr(&options)?;
    qrstudio::output::save_as(&image, &args.output)?;

    println!(
        "Saved {}x{} QR code to {}",
        image.width(),
        image.height(),
        args.output.display()
    );
    Ok(())
}
