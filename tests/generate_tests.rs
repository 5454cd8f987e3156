#[cfg(test)]
mod generate_tests {
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
    use test_case::test_case;

    use qrstudio::output::encode_png;
    use qrstudio::style::{EcLevel, MaskKind, ModuleDrawer, VersionChoice};
    use qrstudio::{QrOptions, Rgb, build_qr};

    fn scan(image: &RgbaImage) -> String {
        let luma = DynamicImage::ImageRgba8(image.clone()).to_luma8();
        scan_luma(&luma)
    }

    fn scan_luma(luma: &GrayImage) -> String {
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            luma.width() as usize,
            luma.height() as usize,
            |x, y| luma.get_pixel(x as u32, y as u32)[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1, "expected exactly one symbol");
        let (_meta, content) = grids[0].decode().expect("Failed to read QR");
        content
    }

    /// Reads each module at its center pixel and redraws the symbol with
    /// plain squares, the way a reader samples a styled code.
    fn scan_module_centers(image: &RgbaImage, box_size: u32, border: u32) -> String {
        let luma = DynamicImage::ImageRgba8(image.clone()).to_luma8();
        let modules = luma.width() / box_size - 2 * border;
        let (cell, quiet) = (4, 4);
        let side = (modules + 2 * quiet) * cell;
        let crisp = GrayImage::from_fn(side, side, |x, y| {
            let (mx, my) = (x / cell, y / cell);
            if mx < quiet || my < quiet || mx >= modules + quiet || my >= modules + quiet {
                return Luma([255]);
            }
            let cx = (border + mx - quiet) * box_size + box_size / 2;
            let cy = (border + my - quiet) * box_size + box_size / 2;
            if luma.get_pixel(cx, cy)[0] < 128 { Luma([0]) } else { Luma([255]) }
        });
        scan_luma(&crisp)
    }

    #[test_case("square", "solid"; "square_solid")]
    #[test_case("rounded", "solid"; "rounded_solid")]
    #[test_case("square", "radial_gradient"; "square_radial")]
    #[test_case("rounded", "square_gradient"; "rounded_square_gradient")]
    #[test_case("Square", "Horizontal Gradient"; "desktop_labels")]
    #[test_case("square", "vertical_gradient"; "square_vertical")]
    fn styled_symbols_scan_back(drawer: &str, mask: &str) {
        let options = QrOptions {
            data: "https://example.com/styled?q=1".to_string(),
            drawer: ModuleDrawer::lookup(drawer),
            mask: MaskKind::lookup(mask),
            ..QrOptions::default()
        };
        let image = build_qr(&options).unwrap();
        assert_eq!(scan(&image), options.data);
    }

    #[test_case("square"; "square")]
    #[test_case("gapped_square"; "gapped_square")]
    #[test_case("circle"; "circle")]
    #[test_case("rounded"; "rounded")]
    #[test_case("vertical_bars"; "vertical_bars")]
    #[test_case("horizontal_bars"; "horizontal_bars")]
    fn every_drawer_reads_back_at_module_centers(drawer: &str) {
        let options = QrOptions {
            data: "https://example.com/drawers".to_string(),
            drawer: ModuleDrawer::lookup(drawer),
            ..QrOptions::default()
        };
        assert_eq!(options.drawer.id(), drawer);
        let image = build_qr(&options).unwrap();
        assert_eq!(scan_module_centers(&image, options.box_size, options.border), options.data);
    }

    #[test_case("vertical_bars"; "vertical_bars")]
    #[test_case("horizontal_bars"; "horizontal_bars")]
    #[test_case("circle"; "circle")]
    fn shaped_drawers_with_gradients_read_back(drawer: &str) {
        let options = QrOptions {
            data: "bars and dots".to_string(),
            drawer: ModuleDrawer::lookup(drawer),
            mask: MaskKind::lookup("radial_gradient"),
            ..QrOptions::default()
        };
        let image = build_qr(&options).unwrap();
        assert_eq!(scan_module_centers(&image, options.box_size, options.border), options.data);
    }

    #[test_case(EcLevel::L; "level_l")]
    #[test_case(EcLevel::M; "level_m")]
    #[test_case(EcLevel::Q; "level_q")]
    #[test_case(EcLevel::H; "level_h")]
    fn every_level_scans(ec_level: EcLevel) {
        let options = QrOptions {
            data: "Hello, world!".to_string(),
            ec_level,
            ..QrOptions::default()
        };
        assert_eq!(scan(&build_qr(&options).unwrap()), "Hello, world!");
    }

    #[test]
    fn colored_symbol_keeps_its_colors() {
        let options = QrOptions {
            fill: Rgb(20, 40, 120),
            back: Rgb(250, 240, 200),
            ..QrOptions::default()
        };
        let image = build_qr(&options).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([250, 240, 200, 255]));
        // First finder module sits right after the border.
        assert_eq!(*image.get_pixel(45, 45), Rgba([20, 40, 120, 255]));
        assert_eq!(scan(&image), options.data);
    }

    #[test]
    fn fixed_version_sets_the_size() {
        let options = QrOptions { version: VersionChoice::Fixed(10), border: 0, box_size: 4, ..QrOptions::default() };
        let image = build_qr(&options).unwrap();
        // Version 10 is 57 modules wide.
        assert_eq!(image.width(), 57 * 4);
    }

    #[test]
    fn embedded_logo_still_scans_at_level_h() {
        let logo_path = std::env::temp_dir().join(format!("qrstudio-logo-{}.png", uuid::Uuid::new_v4()));
        let logo = RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255]));
        std::fs::write(&logo_path, encode_png(&logo).unwrap()).unwrap();

        let options = QrOptions {
            data: "https://example.com/logo".to_string(),
            version: VersionChoice::Fixed(10),
            ec_level: EcLevel::H,
            embedded_image: Some(logo_path.clone()),
            ..QrOptions::default()
        };
        let image = build_qr(&options).unwrap();
        let mid = image.width() / 2;
        assert_eq!(*image.get_pixel(mid, mid), Rgba([255, 255, 255, 255]));
        assert_eq!(scan(&image), options.data);

        std::fs::remove_file(&logo_path).unwrap();
    }

    #[test]
    fn logo_without_extension_is_sniffed() {
        let logo_path = std::env::temp_dir().join(format!("qrstudio-logo-{}", uuid::Uuid::new_v4()));
        let logo = RgbaImage::from_pixel(8, 8, Rgba([200, 0, 0, 255]));
        std::fs::write(&logo_path, encode_png(&logo).unwrap()).unwrap();

        let options = QrOptions {
            ec_level: EcLevel::H,
            embedded_image: Some(logo_path.clone()),
            ..QrOptions::default()
        };
        assert!(build_qr(&options).is_ok());

        std::fs::remove_file(&logo_path).unwrap();
    }
}
