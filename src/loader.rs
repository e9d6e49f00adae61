// loader.rs — panorama decoding off the event-loop thread

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

use image::io::Reader as ImageReader;

use crate::error::{Result, ViewerError};

pub fn decode_image(path: &Path) -> Result<image::RgbaImage> {
    let file = File::open(path).map_err(|source| ViewerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|mut r| {
            // 全景图常常超过默认尺寸限制
            r.no_limits();
            r.decode()
        })
        .map_err(|source| ViewerError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let rgba = decoded.to_rgba8();
    log::info!(
        "decoded {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}

/// Decodes `path` on a worker thread and sends the result back to the event loop.
pub fn start_load_image(path: PathBuf, tx: Sender<Result<image::RgbaImage>>) {
    log::info!("loading {} in background", path.display());
    thread::spawn(move || {
        if tx.send(decode_image(&path)).is_err() {
            log::warn!("image receiver dropped before {} finished", path.display());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    #[test]
    fn test_decode_png_roundtrip() {
        let path = std::env::temp_dir().join(format!("photosphere-{}.png", std::process::id()));
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let (tx, rx) = channel();
        start_load_image(path.clone(), tx);
        let loaded = rx.recv_timeout(Duration::from_secs(10)).unwrap().unwrap();
        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(loaded.get_pixel(3, 1), &image::Rgba([10, 20, 30, 255]));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = decode_image(Path::new("/nonexistent/pano.jpg")).unwrap_err();
        assert!(matches!(err, ViewerError::Io { .. }));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let path = std::env::temp_dir().join(format!("photosphere-junk-{}.jpg", std::process::id()));
        std::fs::write(&path, b"definitely not an image").unwrap();
        let err = decode_image(&path).unwrap_err();
        assert!(matches!(err, ViewerError::Decode { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
