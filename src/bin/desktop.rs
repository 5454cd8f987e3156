use std::io::{self, Write};
use std::path::PathBuf;

use qrstudio::style::{EcLevel, MaskKind, ModuleDrawer};
use qrstudio::DesktopForm;
use tracing_subscriber::EnvFilter;

fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn pick(title: &str, options: &[&str]) -> io::Result<Option<String>> {
    println!("{title}:");
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {}", i + 1, option);
    }
    let Some(answer) = prompt("Choice: ")? else {
        return Ok(None);
    };
    Ok(answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i))
        .map(|s| s.to_string()))
}

fn print_form(form: &DesktopForm) {
    let mask = MaskKind::lookup(&form.color_mask);
    let (fill_label, end_label) = mask.color_labels();

    println!();
    println!("=== QR Code Generator ===");
    println!("  1) Data: {}", form.data);
    println!("  2) Version: {}", form.version);
    println!("  3) Error Correction: {}", form.ec_level.label());
    println!("  4) Box Size: {}", form.box_size);
    println!("  5) Border: {}", form.border);
    println!("  6) {fill_label}: {}", form.fill_color);
    println!("  7) Background: {}", form.back_color);
    if let Some(end_label) = end_label {
        println!(
            "  8) {end_label}: {}",
            form.gradient_color.as_deref().unwrap_or("#0000ff (default)")
        );
    }
    println!("  9) Module Shape: {}", form.module_drawer);
    println!(" 10) Color Style: {}", form.color_mask);
    println!(" 11) Embedded Image: {}", form.embedded_image_label());
    println!("  c) Clear Image   g) Generate QR Code   s) Save QR Code   q) Quit");
}

fn generate(form: &mut DesktopForm) {
    match form.generate() {
        Ok(image) => {
            let (w, h) = image.dimensions();
            match form.text_preview() {
                Ok(text) => println!("{text}"),
                Err(e) => eprintln!("Preview unavailable: {e}"),
            }
            let shown = form.preview().map(|p| p.dimensions()).unwrap_or((w, h));
            println!("Generated {w}x{h} image (preview {}x{})", shown.0, shown.1);
        }
        Err(e) => eprintln!("Error: Failed to generate QR code: {e}"),
    }
}

fn save(form: &DesktopForm) -> io::Result<()> {
    if form.image().is_none() {
        eprintln!("Error: No QR code has been generated");
        return Ok(());
    }
    let Some(path) = prompt("Save as (.png, .jpg, .bmp) [qrcode.png]: ")? else {
        return Ok(());
    };
    let path = if path.trim().is_empty() { PathBuf::from("qrcode.png") } else { PathBuf::from(path.trim()) };
    let path = if path.extension().is_none() { path.with_extension("png") } else { path };

    match form.save(&path) {
        Ok(()) => println!("QR code saved to {}", path.display()),
        Err(e) => eprintln!("Error: Failed to save QR code: {e}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut form = DesktopForm::default();
    generate(&mut form);

    loop {
        print_form(&form);
        let Some(choice) = prompt("> ")? else {
            break;
        };

        match choice.trim() {
            "1" => {
                if let Some(data) = prompt("Data: ")? {
                    form.data = data;
                }
            }
            "2" => {
                if let Some(version) = prompt("Version (Auto or 1-40): ")? {
                    form.version = version.trim().to_string();
                }
            }
            "3" => {
                let labels: Vec<&str> = EcLevel::ALL.iter().map(|l| l.label()).collect();
                if let Some(label) = pick("Error Correction", &labels)? {
                    form.ec_level = EcLevel::lookup(&label[..1]);
                }
            }
            "4" => match prompt("Box Size (1-100): ")?.map(|s| s.trim().parse::<u32>()) {
                Some(Ok(size)) => form.box_size = size,
                Some(Err(_)) => eprintln!("Error: Box size must be a number"),
                None => {}
            },
            "5" => match prompt("Border (0-100): ")?.map(|s| s.trim().parse::<u32>()) {
                Some(Ok(border)) => form.border = border,
                Some(Err(_)) => eprintln!("Error: Border must be a number"),
                None => {}
            },
            "6" => {
                if let Some(color) = prompt("Color (#RRGGBB): ")? {
                    form.fill_color = color.trim().to_string();
                }
            }
            "7" => {
                if let Some(color) = prompt("Background (#RRGGBB): ")? {
                    form.back_color = color.trim().to_string();
                }
            }
            "8" => {
                if let Some(color) = prompt("Gradient end color (#RRGGBB, blank for default): ")? {
                    let color = color.trim();
                    form.gradient_color = (!color.is_empty()).then(|| color.to_string());
                }
            }
            "9" => {
                if let Some(label) = pick("Module Shape", &ModuleDrawer::LABELS)? {
                    form.module_drawer = label;
                }
            }
            "10" => {
                if let Some(label) = pick("Color Style", &MaskKind::LABELS)? {
                    form.color_mask = label;
                }
            }
            "11" => {
                if let Some(path) = prompt("Image path (png, jpg, jpeg, bmp, gif): ")? {
                    let path = PathBuf::from(path.trim());
                    if path.is_file() {
                        form.embedded_image = Some(path);
                    } else {
                        eprintln!("Error: {} is not a file", path.display());
                    }
                }
            }
            "c" => form.clear_embedded_image(),
            "g" => generate(&mut form),
            "s" => save(&form)?,
            "q" => break,
            "" => {}
            other => eprintln!("Unknown option '{other}'"),
        }
    }

    Ok(())
}
