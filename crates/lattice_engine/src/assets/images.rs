//! Image loading for texture elements

use super::AssetError;
use std::path::Path;

/// Decoded image summary for building a texture element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureData {
    /// Width in pixels (per face for cubemaps)
    pub width: u32,
    /// Height in pixels (per face for cubemaps)
    pub height: u32,
    /// Whether the pixel layout carries an alpha channel
    pub has_alpha: bool,
}

/// Decode a flat image.
pub fn load_texture(path: &Path) -> Result<TextureData, AssetError> {
    let image = image::open(path).map_err(|err| match err {
        image::ImageError::IoError(io)
            if io.kind() == std::io::ErrorKind::NotFound =>
        {
            AssetError::NotFound(path.display().to_string())
        }
        other => AssetError::Image(other),
    })?;
    Ok(TextureData {
        width: image.width(),
        height: image.height(),
        has_alpha: image.color().has_alpha(),
    })
}

/// Decode the six faces of a cubemap.
///
/// Faces arrive in +X, -X, +Y, -Y, +Z, -Z order and must all share one
/// square size.
pub fn load_cubemap(paths: &[&Path; 6]) -> Result<TextureData, AssetError> {
    let mut faces = paths.iter().map(|path| load_texture(path));
    let first = faces.next().unwrap_or_else(|| {
        Err(AssetError::InvalidData("cubemap without faces".to_owned()))
    })?;
    if first.width != first.height {
        return Err(AssetError::InvalidData(format!(
            "cubemap faces must be square, got {}x{}",
            first.width, first.height
        )));
    }
    for face in faces {
        let face = face?;
        if (face.width, face.height) != (first.width, first.height) {
            return Err(AssetError::InvalidData(format!(
                "cubemap face size {}x{} differs from {}x{}",
                face.width, face.height, first.width, first.height
            )));
        }
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_png(name: &str, width: u32, height: u32, rgba: bool) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lattice-img-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        if rgba {
            let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba([1, 2, 3, 4]));
            buffer.save(&path).unwrap();
        } else {
            let buffer = image::RgbImage::from_pixel(width, height, image::Rgb([1, 2, 3]));
            buffer.save(&path).unwrap();
        }
        path
    }

    #[test]
    fn png_decodes_with_alpha_flag() {
        let opaque = write_png("opaque.png", 4, 2, false);
        let translucent = write_png("translucent.png", 2, 2, true);

        let data = load_texture(&opaque).unwrap();
        assert_eq!((data.width, data.height, data.has_alpha), (4, 2, false));
        assert!(load_texture(&translucent).unwrap().has_alpha);

        std::fs::remove_file(opaque).unwrap();
        std::fs::remove_file(translucent).unwrap();
    }

    #[test]
    fn missing_image_maps_to_not_found() {
        let err = load_texture(Path::new("/nonexistent/lattice.png")).unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn cubemap_faces_must_agree() {
        let big = write_png("face-big.png", 8, 8, false);
        let small = write_png("face-small.png", 4, 4, false);
        let faces = [
            big.as_path(),
            small.as_path(),
            big.as_path(),
            big.as_path(),
            big.as_path(),
            big.as_path(),
        ];
        assert!(matches!(
            load_cubemap(&faces),
            Err(AssetError::InvalidData(_))
        ));

        let square = [
            big.as_path(),
            big.as_path(),
            big.as_path(),
            big.as_path(),
            big.as_path(),
            big.as_path(),
        ];
        let data = load_cubemap(&square).unwrap();
        assert_eq!((data.width, data.height), (8, 8));

        std::fs::remove_file(big).unwrap();
        std::fs::remove_file(small).unwrap();
    }
}
