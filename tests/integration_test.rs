//! Integration tests for the extraction driver
//!
//! These tests run the whole per-slide pipeline against an in-memory
//! slide source so no real slide files are needed. Output goes to a
//! throwaway directory under the system temp dir.

use std::fs;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{Rgb, RgbImage};

use patchkit::annotation::LabelPolicy;
use patchkit::config::Config;
use patchkit::extractor::ExtractionDriver;
use patchkit::slide::{ExtractError, ExtractResult, OpenedSlide, SlideImage, SlideSource};
use patchkit::utils::logger::Logger;

/// Slide source holding decoded images and annotation markup in memory,
/// counting every region read it serves
struct MemorySlideSource {
    slides: Vec<(String, RgbImage, Option<String>)>,
    reads: Arc<AtomicUsize>,
}

impl MemorySlideSource {
    fn new() -> Self {
        MemorySlideSource {
            slides: Vec::new(),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn add_slide(&mut self, id: &str, pixels: RgbImage, xml: Option<String>) {
        self.slides.push((id.to_string(), pixels, xml));
    }

    fn region_reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl SlideSource for MemorySlideSource {
    fn slide_ids(&self) -> ExtractResult<Vec<String>> {
        Ok(self.slides.iter().map(|(id, _, _)| id.clone()).collect())
    }

    fn open(&self, slide_id: &str) -> ExtractResult<Box<dyn SlideImage>> {
        let (_, pixels, _) = self
            .slides
            .iter()
            .find(|(id, _, _)| id == slide_id)
            .ok_or_else(|| ExtractError::SlideNotFound(slide_id.to_string()))?;
        Ok(Box::new(CountingSlide {
            inner: OpenedSlide::new(pixels.clone()),
            reads: Arc::clone(&self.reads),
        }))
    }

    fn find_slide_path(&self, _pattern: &str) -> Option<PathBuf> {
        None
    }

    fn annotation_documents(&self, slide_id: &str) -> ExtractResult<Vec<Box<dyn Read>>> {
        let (_, _, xml) = self
            .slides
            .iter()
            .find(|(id, _, _)| id == slide_id)
            .ok_or_else(|| ExtractError::SlideNotFound(slide_id.to_string()))?;
        match xml {
            Some(xml) => Ok(vec![Box::new(Cursor::new(xml.clone().into_bytes()))]),
            None => Err(ExtractError::AnnotationNotFound(slide_id.to_string())),
        }
    }
}

/// Wraps an open slide and counts region reads
struct CountingSlide {
    inner: OpenedSlide,
    reads: Arc<AtomicUsize>,
}

impl SlideImage for CountingSlide {
    fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    fn read_region(
        &self,
        location: (i64, i64),
        level: u32,
        size: (u32, u32),
        pad: bool,
    ) -> ExtractResult<RgbImage> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_region(location, level, size, pad)
    }
}

fn point_region(label: &str, x: f64, y: f64) -> String {
    format!(
        "<Region Type=\"3\" Text=\"{}\"><Vertices><Vertex X=\"{}\" Y=\"{}\"/></Vertices></Region>",
        label, x, y
    )
}

fn annotation_xml(regions: &[String]) -> String {
    format!(
        "<Annotations><Annotation><Regions>{}</Regions></Annotation></Annotations>",
        regions.concat()
    )
}

/// Fresh output directory under the system temp dir
fn test_output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("patchkit_it_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_config(output_dir: &PathBuf, policy: LabelPolicy) -> Config {
    let mut config = Config::default();
    config.patches_dir = output_dir.clone();
    config.patch_width = 32;
    config.patch_height = 32;
    config.resolution_scale = 1.0;
    config.pyramid_level = 0;
    config.context_mask_radius = 8;
    config.label_policy = policy;
    config
}

fn test_logger(output_dir: &PathBuf) -> Logger {
    let log_path = output_dir.join("test.log");
    Logger::new(log_path.to_str().unwrap()).unwrap()
}

fn three_point_source() -> MemorySlideSource {
    let mut source = MemorySlideSource::new();
    let pixels = RgbImage::from_pixel(128, 128, Rgb([180, 160, 170]));
    let xml = annotation_xml(&[
        point_region("0", 40.0, 40.0),
        point_region("1", 64.0, 64.0),
        point_region("2", 90.0, 90.0),
    ]);
    source.add_slide("slideA.tiff", pixels, Some(xml));
    source
}

#[test]
fn test_end_to_end_three_points() {
    let dir = test_output_dir("three_points");
    let source = three_point_source();
    let config = test_config(&dir, LabelPolicy::Strict);
    let logger = test_logger(&dir);

    let driver = ExtractionDriver::new(&source, &config, &logger);
    let report = driver.run(false).unwrap();

    assert_eq!(report.slides.len(), 1);
    assert_eq!(report.slides[0].extracted, 3);
    assert_eq!(report.slides[0].errors, 0);
    assert_eq!(source.region_reads(), 3);

    for name in [
        "slideA_0_Class_0.png",
        "slideA_1_Class_1.png",
        "slideA_2_Class_2.png",
    ] {
        assert!(dir.join(name).exists(), "missing output {}", name);
    }

    // Saved artifact is region and mask side by side: double width
    let patch = image::open(dir.join("slideA_0_Class_0.png")).unwrap().to_rgb8();
    assert_eq!(patch.dimensions(), (64, 32));
    // Mask half carries class 0 as fill value 1 at the patch center
    assert_eq!(*patch.get_pixel(32 + 16, 16), Rgb([0, 0, 1]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_bad_label_is_isolated() {
    let dir = test_output_dir("bad_label");
    let mut source = MemorySlideSource::new();
    let pixels = RgbImage::from_pixel(128, 128, Rgb([180, 160, 170]));
    let xml = annotation_xml(&[
        point_region("0", 40.0, 40.0),
        point_region("abc", 64.0, 64.0),
        point_region("2", 90.0, 90.0),
    ]);
    source.add_slide("slideA.tiff", pixels, Some(xml));

    // Lenient policy admits the bad label; mask construction rejects it
    let config = test_config(&dir, LabelPolicy::Lenient);
    let logger = test_logger(&dir);

    let driver = ExtractionDriver::new(&source, &config, &logger);
    let report = driver.run(false).unwrap();

    assert_eq!(report.slides[0].extracted, 2);
    assert_eq!(report.slides[0].errors, 1);
    assert!(dir.join("slideA_0_Class_0.png").exists());
    assert!(!dir.join("slideA_1_Class_abc.png").exists());
    assert!(dir.join("slideA_2_Class_2.png").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_rerun_skips_existing_outputs() {
    let dir = test_output_dir("resume");
    // Pre-create every planned output; content is irrelevant, only
    // existence is checked
    for name in [
        "slideA_0_Class_0.png",
        "slideA_1_Class_1.png",
        "slideA_2_Class_2.png",
    ] {
        fs::write(dir.join(name), b"").unwrap();
    }

    let source = three_point_source();
    let config = test_config(&dir, LabelPolicy::Strict);
    let logger = test_logger(&dir);

    let driver = ExtractionDriver::new(&source, &config, &logger);
    let report = driver.run(false).unwrap();

    assert_eq!(source.region_reads(), 0);
    assert_eq!(report.slides[0].extracted, 3);
    assert_eq!(report.slides[0].errors, 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_dry_run_reads_but_writes_nothing() {
    let dir = test_output_dir("dry_run");
    let source = three_point_source();
    let config = test_config(&dir, LabelPolicy::Strict);
    let logger = test_logger(&dir);

    let driver = ExtractionDriver::new(&source, &config, &logger);
    let report = driver.run(true).unwrap();

    assert_eq!(source.region_reads(), 3);
    assert_eq!(report.slides[0].errors, 0);
    let pngs = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".png"))
        .count();
    assert_eq!(pngs, 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_annotation_is_fatal() {
    let dir = test_output_dir("fatal");
    let mut source = MemorySlideSource::new();
    let pixels = RgbImage::from_pixel(64, 64, Rgb([100, 100, 100]));
    source.add_slide("broken.tiff", pixels, None);

    let config = test_config(&dir, LabelPolicy::Strict);
    let logger = test_logger(&dir);

    let driver = ExtractionDriver::new(&source, &config, &logger);
    let result = driver.run(false);

    assert!(matches!(result, Err(ExtractError::AnnotationNotFound(_))));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_padded_read_near_border() {
    let slide = OpenedSlide::new(RgbImage::from_pixel(16, 16, Rgb([9, 9, 9])));
    let region = slide.read_region((-4, -4), 0, (8, 8), true).unwrap();

    assert_eq!(region.dimensions(), (8, 8));
    // Padding outside the slide is zero-filled
    assert_eq!(*region.get_pixel(0, 0), Rgb([0, 0, 0]));
    assert_eq!(*region.get_pixel(3, 3), Rgb([0, 0, 0]));
    // The in-bounds part carries slide pixels
    assert_eq!(*region.get_pixel(4, 4), Rgb([9, 9, 9]));
    assert_eq!(*region.get_pixel(7, 7), Rgb([9, 9, 9]));
}

#[test]
fn test_read_fully_outside_slide_fails() {
    let slide = OpenedSlide::new(RgbImage::from_pixel(16, 16, Rgb([9, 9, 9])));
    let result = slide.read_region((100, 100), 0, (8, 8), true);

    assert!(matches!(result, Err(ExtractError::RegionOutOfBounds { .. })));
}

#[test]
fn test_unpadded_read_rejects_partial_overlap() {
    let slide = OpenedSlide::new(RgbImage::from_pixel(16, 16, Rgb([9, 9, 9])));
    let result = slide.read_region((-4, -4), 0, (8, 8), false);

    assert!(matches!(result, Err(ExtractError::RegionOutOfBounds { .. })));
}

#[test]
fn test_pyramid_level_downsamples() {
    let slide = OpenedSlide::new(RgbImage::from_pixel(32, 32, Rgb([50, 60, 70])));
    // Level 1 covers twice the native footprint per output pixel
    let region = slide.read_region((0, 0), 1, (16, 16), true).unwrap();

    assert_eq!(region.dimensions(), (16, 16));
    assert_eq!(*region.get_pixel(8, 8), Rgb([50, 60, 70]));
}
