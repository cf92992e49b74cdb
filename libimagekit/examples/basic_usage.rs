//! Basic usage example for the libimagekit library.
//!
//! Reads image metadata by URL and lists the account's custom fields.
//!
//! Run with:
//!   IMAGEKIT_PRIVATE_KEY=private_... cargo run --example basic_usage -- <image-url>

use libimagekit::{Context, ImageKitError, MetadataApi};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://ik.imagekit.io/demo/default-image.jpg".to_string());

    let api = match MetadataApi::new() {
        Ok(api) => api,
        Err(e) => {
            eprintln!("✗ {}", e);
            eprintln!("  Set IMAGEKIT_PRIVATE_KEY (and optionally IMAGEKIT_PUBLIC_KEY, IMAGEKIT_ENDPOINT_URL)");
            return Ok(());
        }
    };
    let ctx = Context::background().with_timeout(Duration::from_secs(10));

    println!("Fetching metadata for {}\n", url);
    match api.fetch_from_url(&ctx, &url).await {
        Ok(metadata) => {
            let m = metadata.data;
            println!("  Format:       {}", m.format);
            println!("  Dimensions:   {}x{}", m.width, m.height);
            println!("  Size:         {} bytes", m.size);
            println!("  pHash:        {}", m.p_hash);
            println!("  Transparency: {}", m.has_transparency);
            if !m.exif.image.make.is_empty() {
                println!("  Camera:       {} {}", m.exif.image.make, m.exif.image.model);
            }
        }
        Err(ImageKitError::Service { message, help, .. }) => {
            eprintln!("✗ Service error: {}", message);
            if let Some(help) = help {
                eprintln!("  {}", help);
            }
        }
        Err(e) => return Err(e.into()),
    }

    println!("\nCustom fields:");
    let fields = api.custom_fields(&ctx, false).await?;
    if fields.data.is_empty() {
        println!("  (none)");
    }
    for field in fields.data {
        println!(
            "  {:<20} {:<12?} {}",
            field.name, field.schema.field_type, field.label
        );
    }

    Ok(())
}
