//! Factory functions for creating test data.
//!
//! Provides a small shape catalog covering every footprint and category plus
//! helpers to build keys, records and documents used in tests and by the
//! command interface.

use shared::*;

/// Catalog JSON used across unit and integration tests.
///
/// Connection points mix the string grammar and the list form on purpose.
pub const TEST_CATALOG_JSON: &str = r#"{
  "bodies": {
    "0_deg": [
      {"name": "horizontal", "cell_orientation": "center",
       "allowed_connection_points": "left 0_deg, right 0_deg"},
      {"name": "vertical", "cell_orientation": "center",
       "allowed_connection_points": "top 0_deg.*, bottom 0_deg.*"},
      {"name": "lonely"},
      {"name": "shape_a", "allowed_connection_points": "right center 0_deg.shape_b"},
      {"name": "shape_b", "allowed_connection_points": "top *"},
      {"name": "hub", "cellOrientation": "middle",
       "allowedConnectionPoints": [
         {"direction": "top", "allowed": ["*"]},
         {"direction": "bottom", "allowed": ["*"]},
         {"direction": "left", "allowed": ["*"]},
         {"direction": "right", "allowed": ["*"]},
         {"direction": "top left", "allowed": ["*"]},
         {"direction": "top right", "allowed": ["*"]},
         {"direction": "bottom left", "allowed": ["*"]},
         {"direction": "bottom right", "allowed": ["*"]}
       ]}
    ],
    "45_deg": [
      {"name": "lean", "cell_orientation": "top left",
       "allowed_connection_points": "bottom right *; top left *"}
    ]
  },
  "serifs": {
    "0_deg": [
      {"name": "cap", "cell_orientation": "top", "allowed_connection_points": "bottom *"}
    ],
    "22_5_deg": [
      {"name": "flag", "cell_orientation": "bottom", "allowed_connection_points": "top *"},
      {"name": "diagonal_sweep", "cell_orientation": "top left",
       "allowed_connection_points": "bottom right *"}
    ]
  },
  "joins": {
    "0_deg": [
      {"name": "bridge", "width": 2, "cell_orientation": "center",
       "allowed_connection_points": "left *, right *"}
    ],
    "45_deg": [
      {"name": "link", "allowed_connection_points": "top left *, bottom right *"}
    ],
    "90_deg": [
      {"name": "stem", "height": 2, "cell_orientation": "top",
       "allowed_connection_points": "top *, bottom *"},
      {"name": "drop", "height": 2, "cell_orientation": "bottom"}
    ]
  }
}"#;

/// Parsed test catalog.
pub fn test_catalog() -> ShapeCatalog {
    match ShapeCatalog::from_json(TEST_CATALOG_JSON) {
        Ok(catalog) => catalog,
        Err(e) => panic!("test catalog is invalid: {e}"),
    }
}

// ── Keys ────────────────────────────────────────────────────────

pub fn body_key(bucket: &str, name: &str) -> ShapeKey {
    ShapeKey::new(Category::Bodies, bucket, name)
}

pub fn serif_key(bucket: &str, name: &str) -> ShapeKey {
    ShapeKey::new(Category::Serifs, bucket, name)
}

pub fn join_key(bucket: &str, name: &str) -> ShapeKey {
    ShapeKey::new(Category::Joins, bucket, name)
}

// ── Documents ───────────────────────────────────────────────────

/// A shape record at `cell`.
pub fn record(cell: usize, key: &ShapeKey) -> ShapeRecord {
    ShapeRecord {
        cell_index: cell,
        category: key.category,
        angle_bucket: key.angle_bucket.clone(),
        shape_name: key.shape_name.clone(),
        texture: None,
    }
}

/// Document with the given records, routed to their grid by category.
pub fn document_with(name: &str, records: Vec<ShapeRecord>) -> CompositionDocument {
    let mut doc = CompositionDocument::new(name);
    for r in records {
        match r.category.grid_kind() {
            GridKind::Serifs => doc.grids.serifs.shapes.push(r),
            GridKind::Joins => doc.grids.joins.shapes.push(r),
        }
    }
    doc
}

/// A small letter: a body at the centre, a serif above it and a join.
pub fn sample_document(name: &str) -> CompositionDocument {
    document_with(
        name,
        vec![
            record(12, &body_key("0_deg", "horizontal")),
            record(7, &serif_key("0_deg", "cap")),
            record(5, &join_key("0_deg", "bridge")),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_parses() {
        let catalog = test_catalog();
        assert!(catalog.contains(&body_key("0_deg", "horizontal")));
        assert!(catalog.contains(&join_key("90_deg", "stem")));
        assert!(catalog.lookup(&join_key("0_deg", "bridge")).unwrap().is_multi_cell());
    }

    #[test]
    fn test_list_form_connection_points() {
        let catalog = test_catalog();
        let hub = catalog.lookup(&body_key("0_deg", "hub")).unwrap();
        assert_eq!(hub.allowed_connection_points.iter().count(), 8);
    }

    #[test]
    fn test_document_routing() {
        let doc = sample_document("A");
        assert_eq!(doc.grids.serifs.shapes.len(), 2);
        assert_eq!(doc.grids.joins.shapes.len(), 1);
    }
}
