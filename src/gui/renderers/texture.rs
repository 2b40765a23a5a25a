use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::RgbaImage;
use kiss3d::context::Context;
use kiss3d::resource::Texture;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("cannot load texture {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {} is empty", path.display())]
    Empty { path: PathBuf },
}

/// Decodes an image file into 4-channel RGBA, whatever its original channel count.
pub fn decode_rgba(path: &Path) -> Result<RgbaImage, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_owned(),
        source,
    })?;
    let rgba = image.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(TextureError::Empty {
            path: path.to_owned(),
        });
    }
    Ok(rgba)
}

/// Loads and uploads a body's texture. Failures are logged and yield `None`; the body is
/// then drawn untextured instead of taking the whole scene down.
///
/// The texture belongs to the caller alone and is freed when the last `Rc` goes away.
pub fn load_texture(body_name: &str, path: &Path) -> Option<Rc<Texture>> {
    match decode_rgba(path) {
        Ok(rgba) => {
            info!(
                "Loaded texture {} ({}x{}) for {}",
                path.display(),
                rgba.width(),
                rgba.height(),
                body_name
            );
            Some(upload_rgba(&rgba))
        }
        Err(err) => {
            warn!("{}; drawing {} untextured", err, body_name);
            None
        }
    }
}

fn upload_rgba(rgba: &RgbaImage) -> Rc<Texture> {
    let ctxt = Context::get();
    let texture = Texture::new();

    ctxt.active_texture(Context::TEXTURE0);
    ctxt.bind_texture(Context::TEXTURE_2D, Some(&*texture));
    ctxt.tex_image2d(
        Context::TEXTURE_2D,
        0,
        Context::RGBA as i32,
        rgba.width() as i32,
        rgba.height() as i32,
        0,
        Context::RGBA,
        Some(&rgba.as_raw()[..]),
    );
    // u wraps around the seam, v stops at the poles
    ctxt.tex_parameteri(Context::TEXTURE_2D, Context::TEXTURE_WRAP_S, Context::REPEAT as i32);
    ctxt.tex_parameteri(
        Context::TEXTURE_2D,
        Context::TEXTURE_WRAP_T,
        Context::CLAMP_TO_EDGE as i32,
    );
    ctxt.tex_parameteri(Context::TEXTURE_2D, Context::TEXTURE_MIN_FILTER, Context::LINEAR as i32);
    ctxt.tex_parameteri(Context::TEXTURE_2D, Context::TEXTURE_MAG_FILTER, Context::LINEAR as i32);
    ctxt.bind_texture(Context::TEXTURE_2D, None);

    texture
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let path = Path::new("definitely/not/here/pluto.jpg");
        let err = decode_rgba(path).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
        assert!(err
            .to_string()
            .starts_with("cannot load texture definitely/not/here/pluto.jpg"));
    }

    #[test]
    fn test_decodes_to_rgba() {
        let dir = std::env::temp_dir().join(format!("solar-orrery-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.png");

        // Three channels on disk, four after decoding
        let rgb = image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8 * 80, y as u8 * 120, 7]));
        rgb.save(&path).unwrap();

        let rgba = decode_rgba(&path).unwrap();
        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(rgba.get_pixel(2, 1).0, [160, 120, 7, 255]);
        // Tightly packed, which is what the GL upload expects
        assert_eq!(rgba.as_raw().len(), 3 * 2 * 4);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_texture_is_not_fatal() {
        // Fails before any GL call, so no context is needed
        let texture = load_texture("Pluto", Path::new("missing/pluto.jpg"));
        assert!(texture.is_none());
    }
}
