// Minimal check that compositing works end to end without the network

use fotix::{
    imaging::{ImageCompositor, Placement, SourceImage, TargetSpec},
    treatments::{self, TreatmentParams},
};
use image::{Rgba, RgbaImage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📷 Testing Fotix Core Functionality");

    // Test 1: Synthetic source, wide with a transparent corner
    println!("\n1. Creating source image...");
    let pixels = RgbaImage::from_fn(800, 400, |x, y| {
        if x < 100 && y < 100 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([(x / 4) as u8, (y / 2) as u8, 160, 255])
        }
    });
    let source = SourceImage::from_pixels("sample.png", pixels);
    println!("   Source: {}x{}", source.width(), source.height());

    // Test 2: Placement math
    println!("\n2. Testing placements...");
    let cover = Placement::cover((800, 400), (1300, 2000));
    let contain = Placement::contain((800, 400), (400, 400));
    println!("   Cover 1300x2000: {:?}", cover);
    println!("   Contain 400x400: {:?}", contain);
    assert_eq!(cover.width, 4000);
    assert_eq!(contain.height, 200);

    // Test 3: Treatments
    println!("\n3. Testing treatments...");
    let params = TreatmentParams::default();
    for target in [
        TargetSpec::new("site", 1080, 1080),
        TargetSpec::blurred_backdrop("erp", 400, 400),
    ] {
        let treatment = treatments::for_kind(target.treatment);
        let canvas = treatment.render(&source, &target, &params)?;
        println!(
            "   {} ({}): {}x{}",
            target.name,
            treatment.name(),
            canvas.width(),
            canvas.height()
        );

        let preview = format!("minimal_{}.png", target.name);
        match canvas.as_image().save(&preview) {
            Ok(()) => println!("   📁 Preview saved to: {}", preview),
            Err(e) => println!("   ⚠️  Could not save file: {}", e),
        }
    }

    // Test 4: Full compositor
    println!("\n4. Testing compositor...");
    let variants = ImageCompositor::default().composite(
        &source,
        &[
            TargetSpec::new("site", 1300, 2000),
            TargetSpec::blurred_backdrop("erp", 400, 400),
        ],
    )?;
    for variant in &variants {
        println!("   {}: {:.1} KB", variant.name, variant.byte_size as f64 / 1024.0);
    }
    assert_eq!(variants[0].name, "sample_1300x2000.jpg");

    println!("\n🎉 All checks passed! Fotix core is working.");

    Ok(())
}
