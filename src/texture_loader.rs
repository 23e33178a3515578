use std::fs;
use std::io::Cursor;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;
use tracing::{debug, warn};

fn exif_orientation(image_path: &Path, file_bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY).map(|f| &f.value) {
            Some(Value::Short(values)) if !values.is_empty() => values[0],
            _ => 1,
        },
        Err(e) => {
            // Proceed unrotated
            warn!(path = %image_path.display(), error = %e, "could not read EXIF data");
            1
        }
    }
}

/// Loads a slide image into a texture, applying its EXIF orientation.
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("failed to read slide image {}", image_path.display()))?;

    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    // EXIF is only reliable for JPEG
    let orientation = if extension == "jpg" || extension == "jpeg" {
        exif_orientation(image_path, &file_bytes)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&format!(".{}", extension), &file_bytes)
        .map_err(|e| anyhow!("failed to decode {}: {}", image_path.display(), e))?;

    // 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW; flips are ignored
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }
    if orientation != 1 {
        debug!(path = %image_path.display(), orientation, "applied EXIF rotation");
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {}: {}", image_path.display(), e))?;

    Ok(texture)
}
