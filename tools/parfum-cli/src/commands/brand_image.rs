//! Brand artwork upload.

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use super::BrandImageArgs;
use crate::context::Context;
use crate::output::format_bytes;

/// Upload an image and attach it to a brand.
pub async fn run(args: BrandImageArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.file);
    let (content_type, extension) = image_type(&path)?;
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let conn = ctx.connect().await?;
    let admin = ctx.admin(&conn).await?;

    if !ctx.confirm(&format!(
        "Upload {} ({}) for {}?",
        path.display(),
        format_bytes(bytes.len() as u64),
        args.brand
    ))? {
        ctx.output.warn("Aborted.");
        return Ok(());
    }

    let spinner = ctx.output.spinner("Uploading...");
    let image = admin
        .save_brand_image(&args.brand, bytes, content_type, extension)
        .await;
    spinner.finish_and_clear();
    let image = image?;
    conn.persist().await?;

    if ctx.output.is_json() {
        ctx.output.json(&image);
        return Ok(());
    }
    ctx.output
        .success(&format!("{} now uses {}", image.brand, image.image_url));
    Ok(())
}

/// Content type and canonical extension for an image file.
fn image_type(path: &Path) -> Result<(&'static str, &'static str)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    Ok(match ext.as_str() {
        "png" => ("image/png", "png"),
        "jpg" | "jpeg" => ("image/jpeg", "jpg"),
        "webp" => ("image/webp", "webp"),
        "svg" => ("image/svg+xml", "svg"),
        _ => bail!("Unsupported image type '{}'. Use png, jpg, webp or svg.", ext),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_type() {
        assert_eq!(image_type(Path::new("logo.PNG")).unwrap(), ("image/png", "png"));
        assert_eq!(image_type(Path::new("a/b.jpeg")).unwrap(), ("image/jpeg", "jpg"));
        assert!(image_type(Path::new("logo.gif")).is_err());
        assert!(image_type(Path::new("logo")).is_err());
    }
}
