//! Directory-backed slide source
//!
//! Serves slides from a plain directory tree: every image file found
//! under the root is a slide, identified by its file name, and a sibling
//! file with the same stem and an `.xml` extension is its annotation
//! document. Pyramid levels are synthesized by downsampling the decoded
//! image, so level `n` halves the resolution `n` times.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use log::{debug, info, warn};
use regex::Regex;

use crate::slide::errors::{ExtractError, ExtractResult};
use crate::slide::source::{SlideImage, SlideSource};

/// File extensions recognized as slide images
const SLIDE_EXTENSIONS: [&str; 6] = ["tif", "tiff", "png", "jpg", "jpeg", "bmp"];

/// Slide source backed by a directory of image files
pub struct DirectorySlideSource {
    /// Root directory scanned for slide files
    root: PathBuf,
}

impl DirectorySlideSource {
    /// Create a source over the given root directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DirectorySlideSource {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Recursively collect every slide file under the root, sorted by
    /// file name so identifier order is stable across runs
    fn scan(&self) -> ExtractResult<Vec<PathBuf>> {
        let mut slides = Vec::new();
        Self::scan_dir(&self.root, &mut slides)?;
        slides.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
        Ok(slides)
    }

    fn scan_dir(dir: &Path, slides: &mut Vec<PathBuf>) -> ExtractResult<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::scan_dir(&path, slides)?;
            } else if Self::is_slide_file(&path) {
                slides.push(path);
            }
        }
        Ok(())
    }

    fn is_slide_file(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map(|ext| SLIDE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Resolve an identifier to its slide path by exact file-name match
    fn path_for_id(&self, slide_id: &str) -> ExtractResult<PathBuf> {
        let slides = self.scan()?;
        slides
            .into_iter()
            .find(|p| p.file_name().map(|n| n == slide_id).unwrap_or(false))
            .ok_or_else(|| ExtractError::SlideNotFound(slide_id.to_string()))
    }
}

impl SlideSource for DirectorySlideSource {
    fn slide_ids(&self) -> ExtractResult<Vec<String>> {
        let ids = self
            .scan()?
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect::<Vec<_>>();
        info!("Found {} slide(s) under {}", ids.len(), self.root.display());
        Ok(ids)
    }

    fn open(&self, slide_id: &str) -> ExtractResult<Box<dyn SlideImage>> {
        let path = self.path_for_id(slide_id)?;
        debug!("Opening slide {}", path.display());
        let pixels = image::open(&path)?.to_rgb8();
        info!(
            "Opened slide {}: {}x{}",
            slide_id,
            pixels.width(),
            pixels.height()
        );
        Ok(Box::new(OpenedSlide::new(pixels)))
    }

    fn find_slide_path(&self, pattern: &str) -> Option<PathBuf> {
        let slides = self.scan().ok()?;
        // The pattern is usually a plain identifier; treat it as a regex
        // when it compiles and fall back to substring matching otherwise
        let matcher = Regex::new(pattern).ok();
        slides.into_iter().find(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy().to_string());
            let Some(name) = name else {
                return false;
            };
            match &matcher {
                Some(re) => re.is_match(&name),
                None => name.contains(pattern),
            }
        })
    }

    fn annotation_documents(&self, slide_id: &str) -> ExtractResult<Vec<Box<dyn Read>>> {
        let slide_path = self.path_for_id(slide_id)?;
        let xml_path = slide_path.with_extension("xml");
        if !xml_path.exists() {
            warn!("No annotation document next to {}", slide_path.display());
            return Err(ExtractError::AnnotationNotFound(slide_id.to_string()));
        }
        debug!("Loading annotation document {}", xml_path.display());
        let file = File::open(&xml_path)?;
        Ok(vec![Box::new(file)])
    }
}

/// A decoded slide held in memory
pub struct OpenedSlide {
    pixels: RgbImage,
}

impl OpenedSlide {
    /// Wrap an already-decoded RGB buffer as an open slide
    pub fn new(pixels: RgbImage) -> Self {
        OpenedSlide { pixels }
    }
}

impl SlideImage for OpenedSlide {
    fn dimensions(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }

    fn read_region(
        &self,
        location: (i64, i64),
        level: u32,
        size: (u32, u32),
        pad: bool,
    ) -> ExtractResult<RgbImage> {
        let (slide_w, slide_h) = self.dimensions();
        let factor = 1i64 << level;
        let (x0, y0) = location;
        // Native (level 0) footprint of the requested region
        let native_w = size.0 as i64 * factor;
        let native_h = size.1 as i64 * factor;

        let out_of_bounds = ExtractError::RegionOutOfBounds {
            x: x0,
            y: y0,
            width: size.0,
            height: size.1,
        };

        // Reject a region that misses the slide entirely, padded or not
        if x0 >= slide_w as i64 || y0 >= slide_h as i64 || x0 + native_w <= 0 || y0 + native_h <= 0
        {
            return Err(out_of_bounds);
        }
        if !pad
            && (x0 < 0
                || y0 < 0
                || x0 + native_w > slide_w as i64
                || y0 + native_h > slide_h as i64)
        {
            return Err(out_of_bounds);
        }

        // Copy the intersecting part into a zero-filled native buffer;
        // the untouched remainder is the padding
        let mut native = RgbImage::new(native_w as u32, native_h as u32);
        let src_x0 = x0.max(0);
        let src_y0 = y0.max(0);
        let src_x1 = (x0 + native_w).min(slide_w as i64);
        let src_y1 = (y0 + native_h).min(slide_h as i64);
        for sy in src_y0..src_y1 {
            for sx in src_x0..src_x1 {
                let pixel = *self.pixels.get_pixel(sx as u32, sy as u32);
                native.put_pixel((sx - x0) as u32, (sy - y0) as u32, pixel);
            }
        }

        if factor > 1 {
            Ok(imageops::resize(&native, size.0, size.1, FilterType::Triangle))
        } else {
            Ok(native)
        }
    }
}
