//! Point-annotation document parsing
//!
//! Annotation documents are XML trees in the viewer's markup format. A
//! point annotation is a `Region` element whose `Type` attribute is `"3"`,
//! carrying the class label in its `Text` attribute and a single `Vertex`
//! child with floating-point `X`/`Y` image coordinates. Every other region
//! shape is ignored.
//!
//! All documents loaded for one slide are concatenated and parsed as one
//! stream, so the resulting point order is the document order across
//! files. That order is the point index used in output filenames and must
//! stay deterministic between runs.

use std::io::Read;

use log::{debug, warn};
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::extractor::geometry::PatchGeometry;
use crate::slide::errors::{ExtractError, ExtractResult};

/// Region `Type` attribute value marking a point annotation
const POINT_REGION_TYPE: &str = "3";

/// How to treat class labels that are not non-negative integer strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Drop the region at parse time, silently and uncounted
    Strict,
    /// Admit the region; mask construction fails on it later and the
    /// driver counts that failure as an error
    Lenient,
}

/// Parsed point annotations for one slide, as aligned sequences
///
/// Index `i` in every vector refers to the same point. The vectors are
/// only ever grown together.
#[derive(Debug, Default)]
pub struct AnnotationSet {
    /// Annotated point coordinates in level-0 pixels
    pub points_coordinates: Vec<(i64, i64)>,
    /// Class label per point, as written in the document
    pub patch_classes: Vec<String>,
    /// Upper-left read origin per point
    pub patch_origins: Vec<(i64, i64)>,
}

impl AnnotationSet {
    /// Number of annotated points
    pub fn len(&self) -> usize {
        self.points_coordinates.len()
    }

    /// Whether the slide carries no qualifying point annotations
    pub fn is_empty(&self) -> bool {
        self.points_coordinates.is_empty()
    }
}

/// Parse the annotation documents of one slide
///
/// # Arguments
/// * `documents` - Readable streams, one per annotation document
/// * `policy` - Class-label strictness policy
/// * `geometry` - Patch geometry used to derive per-point read origins
///
/// # Returns
/// The aligned (coordinate, label, origin) sequences in document order
pub fn parse_documents(
    documents: Vec<Box<dyn Read>>,
    policy: LabelPolicy,
    geometry: &PatchGeometry,
) -> ExtractResult<AnnotationSet> {
    let mut text = String::new();
    for mut document in documents {
        document.read_to_string(&mut text)?;
    }
    parse_annotation_text(&text, policy, geometry)
}

/// Parse concatenated annotation markup into an annotation set
pub fn parse_annotation_text(
    text: &str,
    policy: LabelPolicy,
    geometry: &PatchGeometry,
) -> ExtractResult<AnnotationSet> {
    let mut reader = Reader::from_str(text);
    let mut set = AnnotationSet::default();

    // Label and first vertex of the point region currently open, if any
    let mut pending: Option<(String, Option<(f64, f64)>)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if name.as_ref().eq_ignore_ascii_case(b"region") {
                    pending = open_point_region(&e, policy)?;
                } else if name.as_ref().eq_ignore_ascii_case(b"vertex") {
                    if let Some((_, vertex @ None)) = pending.as_mut() {
                        *vertex = read_vertex(&e)?;
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                if name.as_ref().eq_ignore_ascii_case(b"region") {
                    // A self-closing region has no vertex and never qualifies
                    pending = None;
                } else if name.as_ref().eq_ignore_ascii_case(b"vertex") {
                    if let Some((_, vertex @ None)) = pending.as_mut() {
                        *vertex = read_vertex(&e)?;
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref().eq_ignore_ascii_case(b"region") {
                    if let Some((label, Some((x, y)))) = pending.take() {
                        push_point(&mut set, label, (x, y), geometry);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ExtractError::XmlError(e.to_string())),
        }
    }

    debug!("Parsed {} point annotation(s)", set.len());
    Ok(set)
}

/// Inspect a region start tag; returns the pending label when the region
/// is a point annotation the policy admits
fn open_point_region(
    e: &BytesStart,
    policy: LabelPolicy,
) -> ExtractResult<Option<(String, Option<(f64, f64)>)>> {
    let region_type = attr_value(e, "type")?;
    if region_type.as_deref() != Some(POINT_REGION_TYPE) {
        return Ok(None);
    }
    let label = attr_value(e, "text")?.unwrap_or_default();
    if policy == LabelPolicy::Strict && !is_numeric_label(&label) {
        warn!("Dropping point region with non-numeric label {:?}", label);
        return Ok(None);
    }
    Ok(Some((label, None)))
}

/// Read a vertex's coordinates, rounding to the nearest integer pixel
fn read_vertex(e: &BytesStart) -> ExtractResult<Option<(f64, f64)>> {
    let x = attr_value(e, "x")?;
    let y = attr_value(e, "y")?;
    let (Some(x), Some(y)) = (x, y) else {
        return Ok(None);
    };
    match (x.parse::<f64>(), y.parse::<f64>()) {
        (Ok(x), Ok(y)) => Ok(Some((x, y))),
        _ => Err(ExtractError::XmlError(format!(
            "Non-numeric vertex coordinates: x={:?}, y={:?}",
            x, y
        ))),
    }
}

/// Append one accepted point to the aligned sequences
fn push_point(set: &mut AnnotationSet, label: String, vertex: (f64, f64), geometry: &PatchGeometry) {
    let point = (vertex.0.round() as i64, vertex.1.round() as i64);
    set.patch_origins.push(geometry.read_origin(point));
    set.points_coordinates.push(point);
    set.patch_classes.push(label);
}

/// Whether a label is a non-negative integer string, the strict policy's
/// acceptance test
fn is_numeric_label(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| c.is_ascii_digit())
}

/// Case-insensitive attribute lookup on a start tag
fn attr_value(e: &BytesStart, name: &str) -> ExtractResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ExtractError::XmlError(e.to_string()))?;
        if attr.key.as_ref().eq_ignore_ascii_case(name.as_bytes()) {
            let value = attr
                .unescape_value()
                .map_err(|e| ExtractError::XmlError(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
