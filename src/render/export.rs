//! Lossless export of composited pages

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use image::RgbImage;

use crate::error::Result;

/// Encode an opaque image as 8-bit RGB PNG
pub fn write_png<W: io::Write>(w: W, image: &RgbImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    // Dropping the writer would swallow an IEND write error
    writer.finish()
}

/// Write `image` to `path` as PNG
pub fn save_png(path: &Path, image: &RgbImage) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_png(&mut out, image)?;
    io::Write::flush(&mut out)?;
    log::info!("Saved {}x{} page to {}", image.width(), image.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Accepts `limit` bytes, then fails every write
    struct ShortSink {
        written: usize,
        limit: usize,
    }

    impl io::Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written + buf.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::StorageFull, "sink full"));
            }
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_trailer_write_failure_is_reported() {
        let img = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        let mut full = Vec::new();
        write_png(&mut full, &img).unwrap();

        // Room for everything except the 12-byte IEND chunk
        let sink = ShortSink {
            written: 0,
            limit: full.len() - 12,
        };
        assert!(write_png(sink, &img).is_err());
    }

    #[test]
    fn test_png_round_trip_is_lossless() {
        let mut img = RgbImage::from_pixel(5, 4, Rgb([255, 255, 178]));
        img.put_pixel(2, 3, Rgb([1, 2, 3]));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        save_png(&path, &img).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("page.png");
        assert!(save_png(&path, &RgbImage::new(1, 1)).is_err());
    }
}
