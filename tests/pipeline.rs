//! End-to-end pipeline tests with real image files on disk.
//!
//! These go through the actual `RustBackend` decoders rather than mocks:
//! synthetic PNGs are written to a temp content directory, referenced from
//! markdown, and pushed through the full annotate flow.

use blurhint::analyze::{Outcome, SkipReason, analyze_image};
use blurhint::annotate::annotate;
use blurhint::config::Config;
use blurhint::imaging::RustBackend;
use blurhint::resolve::NoLookup;
use image::{Rgba, RgbaImage, RgbImage};
use std::path::Path;
use tempfile::TempDir;

fn write_solid_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

#[test]
fn solid_red_golden_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let image_path = tmp.path().join("red.png");
    write_solid_png(&image_path, 100, 100, [255, 0, 0]);

    let outcome = analyze_image(&RustBackend::new(), &image_path, &Config::default()).unwrap();
    let Outcome::Annotated(p) = outcome else {
        panic!("expected annotation, got {outcome:?}");
    };
    assert_eq!((p.width, p.height), (100, 100));
    // Golden value: grid fields all 0b10 over lattice point (2, 7, 5).
    assert_eq!(p.lqip, 174_781);
}

#[test]
fn fully_transparent_png_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let image_path = tmp.path().join("transparent.png");
    RgbaImage::from_pixel(32, 32, Rgba([0, 0, 0, 0]))
        .save(&image_path)
        .unwrap();

    let outcome = analyze_image(&RustBackend::new(), &image_path, &Config::default()).unwrap();
    assert!(
        matches!(outcome, Outcome::Skipped(_)),
        "transparent image must skip, got {outcome:?}"
    );
}

#[test]
fn partially_transparent_png_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let image_path = tmp.path().join("partial.png");
    let mut img = RgbaImage::from_pixel(32, 32, Rgba([200, 10, 10, 255]));
    img.put_pixel(0, 0, Rgba([200, 10, 10, 128]));
    img.save(&image_path).unwrap();

    let outcome = analyze_image(&RustBackend::new(), &image_path, &Config::default()).unwrap();
    assert!(matches!(outcome, Outcome::Skipped(_)));
}

#[test]
fn non_image_reference_skips_before_decoding() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notes.pdf");
    std::fs::write(&path, b"%PDF-1.4 not an image").unwrap();

    let outcome = analyze_image(&RustBackend::new(), &path, &Config::default()).unwrap();
    assert_eq!(
        outcome,
        Outcome::Skipped(SkipReason::UnsupportedFormat("pdf".to_string()))
    );
}

#[test]
fn nonexistent_path_skips_without_raising() {
    let outcome = analyze_image(
        &RustBackend::new(),
        Path::new("/no/such/image.png"),
        &Config::default(),
    )
    .unwrap();
    assert!(matches!(outcome, Outcome::Skipped(_)));
}

#[test]
fn reanalysis_of_identical_file_is_bit_identical() {
    let tmp = TempDir::new().unwrap();
    let image_path = tmp.path().join("gradient.png");
    RgbImage::from_fn(120, 80, |x, y| {
        image::Rgb([(x * 2) as u8, (y * 3) as u8, ((x + y) % 256) as u8])
    })
    .save(&image_path)
    .unwrap();

    let backend = RustBackend::new();
    let config = Config::default();
    let first = analyze_image(&backend, &image_path, &config).unwrap();
    let second = analyze_image(&backend, &image_path, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn annotate_content_directory() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    std::fs::create_dir_all(root.join("posts")).unwrap();
    std::fs::create_dir_all(root.join("images")).unwrap();

    write_solid_png(&root.join("posts/hero.png"), 64, 40, [30, 60, 200]);
    write_solid_png(&root.join("images/map.png"), 48, 48, [10, 160, 90]);

    std::fs::write(
        root.join("posts/trip.md"),
        "\
# Trip

![hero](./hero.png)
![map](~/images/map.png)
![cdn](https://cdn.example.com/remote.png)
![missing](./lost.png)
",
    )
    .unwrap();

    let report = annotate(&RustBackend::new(), root, &Config::default(), &NoLookup).unwrap();
    assert_eq!(report.annotated_count(), 2);
    assert_eq!(report.skipped_count(), 1); // remote URL never becomes a job

    let manifest = report.to_manifest();
    assert_eq!(manifest.documents.len(), 1);
    assert_eq!(manifest.documents[0].path, "posts/trip.md");

    let images = &manifest.documents[0].images;
    assert_eq!(images.len(), 2);
    assert_eq!(
        (images["./hero.png"].width, images["./hero.png"].height),
        (64, 40)
    );
    assert_eq!(
        (
            images["~/images/map.png"].width,
            images["~/images/map.png"].height
        ),
        (48, 48)
    );
}

#[test]
fn annotate_twice_yields_identical_manifests() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_solid_png(&root.join("photo.png"), 50, 30, [90, 90, 20]);
    std::fs::write(root.join("doc.md"), "![p](./photo.png)\n").unwrap();

    let backend = RustBackend::new();
    let config = Config::default();
    let first = annotate(&backend, root, &config, &NoLookup).unwrap();
    let second = annotate(&backend, root, &config, &NoLookup).unwrap();

    let a = serde_json::to_string(&first.to_manifest()).unwrap();
    let b = serde_json::to_string(&second.to_manifest()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn encoded_values_always_fit_the_declared_range() {
    let tmp = TempDir::new().unwrap();
    let backend = RustBackend::new();
    let config = Config::default();

    // A spread of extreme images: boundary lightness, high chroma, noise.
    let cases: Vec<(&str, RgbImage)> = vec![
        ("white", RgbImage::from_pixel(20, 20, image::Rgb([255, 255, 255]))),
        ("black", RgbImage::from_pixel(20, 20, image::Rgb([0, 0, 0]))),
        ("magenta", RgbImage::from_pixel(20, 20, image::Rgb([255, 0, 255]))),
        ("cyan", RgbImage::from_pixel(20, 20, image::Rgb([0, 255, 255]))),
        (
            "noise",
            RgbImage::from_fn(33, 21, |x, y| {
                image::Rgb([
                    (x * 97 % 256) as u8,
                    (y * 31 % 256) as u8,
                    ((x ^ y) * 13 % 256) as u8,
                ])
            }),
        ),
    ];

    for (name, img) in cases {
        let path = tmp.path().join(format!("{name}.png"));
        img.save(&path).unwrap();
        let outcome = analyze_image(&backend, &path, &config).unwrap();
        let Outcome::Annotated(p) = outcome else {
            panic!("{name}: expected annotation");
        };
        assert!(
            (-999_999..=999_999).contains(&p.lqip),
            "{name}: value {} out of range",
            p.lqip
        );
    }
}
