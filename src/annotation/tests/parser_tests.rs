//! Tests for the point-annotation parser

use crate::annotation::parser::{parse_annotation_text, LabelPolicy};
use crate::extractor::geometry::PatchGeometry;

fn point_region(label: &str, x: f64, y: f64) -> String {
    format!(
        "<Region Type=\"3\" Text=\"{}\"><Vertices><Vertex X=\"{}\" Y=\"{}\"/></Vertices></Region>",
        label, x, y
    )
}

fn wrap(regions: &str) -> String {
    format!(
        "<Annotations><Annotation><Regions>{}</Regions></Annotation></Annotations>",
        regions
    )
}

#[test]
fn test_points_in_document_order() {
    let xml = wrap(&format!(
        "{}{}{}",
        point_region("0", 100.0, 200.0),
        point_region("1", 300.0, 400.0),
        point_region("2", 500.0, 600.0)
    ));
    let geometry = PatchGeometry::new(128, 128, 1.0);
    let set = parse_annotation_text(&xml, LabelPolicy::Strict, &geometry).unwrap();

    assert_eq!(set.len(), 3);
    assert_eq!(set.points_coordinates, vec![(100, 200), (300, 400), (500, 600)]);
    assert_eq!(set.patch_classes, vec!["0", "1", "2"]);
}

#[test]
fn test_read_origin_derivation() {
    let xml = wrap(&point_region("0", 100.0, 200.0));
    let geometry = PatchGeometry::new(128, 128, 1.0);
    let set = parse_annotation_text(&xml, LabelPolicy::Strict, &geometry).unwrap();

    // origin = point - scaled_size / 2
    assert_eq!(set.patch_origins, vec![(100 - 64, 200 - 64)]);
}

#[test]
fn test_vertex_coordinates_rounded() {
    let xml = wrap(&point_region("4", 100.6, 200.4));
    let geometry = PatchGeometry::new(64, 64, 1.0);
    let set = parse_annotation_text(&xml, LabelPolicy::Strict, &geometry).unwrap();

    assert_eq!(set.points_coordinates, vec![(101, 200)]);
}

#[test]
fn test_non_point_regions_ignored() {
    let xml = wrap(&format!(
        "<Region Type=\"1\" Text=\"9\"><Vertices>\
         <Vertex X=\"1.0\" Y=\"1.0\"/><Vertex X=\"9.0\" Y=\"9.0\"/>\
         </Vertices></Region>{}",
        point_region("2", 50.0, 60.0)
    ));
    let geometry = PatchGeometry::new(32, 32, 1.0);
    let set = parse_annotation_text(&xml, LabelPolicy::Strict, &geometry).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.patch_classes, vec!["2"]);
}

#[test]
fn test_strict_policy_drops_non_numeric_labels() {
    let xml = wrap(&format!(
        "{}{}{}",
        point_region("0", 10.0, 10.0),
        point_region("abc", 20.0, 20.0),
        point_region("2", 30.0, 30.0)
    ));
    let geometry = PatchGeometry::new(32, 32, 1.0);
    let set = parse_annotation_text(&xml, LabelPolicy::Strict, &geometry).unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.patch_classes, vec!["0", "2"]);
}

#[test]
fn test_lenient_policy_admits_any_label() {
    let xml = wrap(&format!(
        "{}{}",
        point_region("0", 10.0, 10.0),
        point_region("abc", 20.0, 20.0)
    ));
    let geometry = PatchGeometry::new(32, 32, 1.0);
    let set = parse_annotation_text(&xml, LabelPolicy::Lenient, &geometry).unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.patch_classes, vec!["0", "abc"]);
}

#[test]
fn test_document_with_no_point_regions() {
    let xml = wrap("<Region Type=\"2\" Text=\"1\"><Vertices><Vertex X=\"5\" Y=\"5\"/></Vertices></Region>");
    let geometry = PatchGeometry::new(32, 32, 1.0);
    let set = parse_annotation_text(&xml, LabelPolicy::Strict, &geometry).unwrap();

    assert!(set.is_empty());
}

#[test]
fn test_only_first_vertex_is_used() {
    let xml = wrap(
        "<Region Type=\"3\" Text=\"1\"><Vertices>\
         <Vertex X=\"10.0\" Y=\"20.0\"/><Vertex X=\"99.0\" Y=\"99.0\"/>\
         </Vertices></Region>",
    );
    let geometry = PatchGeometry::new(32, 32, 1.0);
    let set = parse_annotation_text(&xml, LabelPolicy::Strict, &geometry).unwrap();

    assert_eq!(set.points_coordinates, vec![(10, 20)]);
}

#[test]
fn test_concatenated_documents_preserve_order() {
    let first = wrap(&point_region("0", 10.0, 10.0));
    let second = wrap(&point_region("1", 20.0, 20.0));
    let combined = format!("{}{}", first, second);
    let geometry = PatchGeometry::new(32, 32, 1.0);
    let set = parse_annotation_text(&combined, LabelPolicy::Strict, &geometry).unwrap();

    assert_eq!(set.patch_classes, vec!["0", "1"]);
    assert_eq!(set.points_coordinates, vec![(10, 10), (20, 20)]);
}
