//! Composition serializer: grid state to document and back.
//!
//! Stateless. `serialize` walks each grid in cell order and emits one record
//! per placement at its anchor cell, keeping insertion order within a cell.
//! `hydrate` replays records per cell: the first record goes through the
//! clearing policy, the rest are overlays. Records that do not resolve are
//! skipped with a warning; hydration never aborts on them.

use std::collections::BTreeMap;

use shared::{CompositionDocument, GridKind, GridSnapshot, ShapeKey, ShapeRecord};

use crate::error::{LoadError, PlaceError};
use crate::grid::{Grid, GridSet};
use crate::placement::{ClearMode, PlacementEngine};

/// Snapshot both grids into a document named `name`
pub fn serialize(grids: &GridSet, name: &str) -> CompositionDocument {
    let mut doc = CompositionDocument::new(name);
    doc.grids.serifs = snapshot(&grids.serifs);
    doc.grids.joins = snapshot(&grids.joins);
    doc
}

fn snapshot(grid: &Grid) -> GridSnapshot {
    GridSnapshot {
        grid_type: grid.kind(),
        grid_size: grid.size(),
        shapes: grid
            .placements()
            .map(|p| ShapeRecord {
                cell_index: p.anchor,
                category: p.key.category,
                angle_bucket: p.key.angle_bucket.clone(),
                shape_name: p.key.shape_name.clone(),
                texture: p.texture.clone(),
            })
            .collect(),
    }
}

/// Record that could not be replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationWarning {
    /// Shape not present in the live catalog
    CatalogLookupMiss { grid: GridKind, cell: usize, key: ShapeKey },
    /// Cell index does not exist on the grid
    InvalidCellIndex { grid: GridKind, cell: usize },
    /// Record resolved but could not be placed
    Rejected { grid: GridKind, cell: usize, error: PlaceError },
}

impl std::fmt::Display for HydrationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HydrationWarning::CatalogLookupMiss { grid, cell, key } => {
                write!(f, "{grid} cell {cell}: {key} is not in the catalog")
            }
            HydrationWarning::InvalidCellIndex { grid, cell } => {
                write!(f, "{grid} cell {cell} does not exist")
            }
            HydrationWarning::Rejected { grid, cell, error } => write!(f, "{grid} cell {cell}: {error}"),
        }
    }
}

/// Outcome of a hydration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydrationReport {
    pub placed: usize,
    pub warnings: Vec<HydrationWarning>,
}

impl HydrationReport {
    pub fn skipped(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Replay `doc` onto `grids`.
///
/// Records of a grid snapshot are routed by the snapshot's `gridType`. A
/// record whose category belongs to the other grid is rejected and reported.
pub fn hydrate(doc: &CompositionDocument, grids: &mut GridSet, engine: &PlacementEngine<'_>) -> HydrationReport {
    let mut report = HydrationReport::default();
    for kind in GridKind::all() {
        let snapshot = doc.grids.get(*kind);
        if snapshot.grid_type != *kind {
            tracing::warn!(
                expected = %kind,
                found = %snapshot.grid_type,
                "grid snapshot type mismatch; using slot"
            );
        }
        hydrate_grid(*kind, &snapshot.shapes, grids, engine, &mut report);
    }

    tracing::info!(
        name = %doc.metadata.name,
        placed = report.placed,
        skipped = report.skipped(),
        "hydrated composition"
    );
    report
}

fn hydrate_grid(
    kind: GridKind,
    records: &[ShapeRecord],
    grids: &mut GridSet,
    engine: &PlacementEngine<'_>,
    report: &mut HydrationReport,
) {
    let mut by_cell: BTreeMap<usize, Vec<&ShapeRecord>> = BTreeMap::new();
    for record in records {
        by_cell.entry(record.cell_index).or_default().push(record);
    }

    for (cell, records) in by_cell {
        if cell >= kind.cell_count() {
            for _ in &records {
                tracing::warn!(grid = %kind, cell, "skipping record with invalid cell index");
                report.warnings.push(HydrationWarning::InvalidCellIndex { grid: kind, cell });
            }
            continue;
        }

        let mut first = true;
        for record in records {
            let key = record.key();
            if !engine.catalog().contains(&key) {
                tracing::warn!(grid = %kind, cell, shape = %key, "skipping shape missing from catalog");
                report.warnings.push(HydrationWarning::CatalogLookupMiss { grid: kind, cell, key });
                continue;
            }

            let mode = if first { ClearMode::Policy } else { ClearMode::Overlay };
            match engine.replay(grids, kind, cell, &key, record.texture.clone(), mode) {
                Ok(_) => {
                    report.placed += 1;
                    first = false;
                }
                Err(error) => {
                    tracing::warn!(grid = %kind, cell, shape = %key, %error, "skipping record");
                    report.warnings.push(HydrationWarning::Rejected { grid: kind, cell, error });
                }
            }
        }
    }
}

/// Parse a document. Malformed input fails before anything is applied.
pub fn parse(json: &str) -> Result<CompositionDocument, LoadError> {
    Ok(CompositionDocument::from_json(json)?)
}

/// Parse and hydrate onto freshly cleared grids.
///
/// On `MalformedDocument` the grids are left exactly as they were.
pub fn load_json(json: &str, grids: &mut GridSet, engine: &PlacementEngine<'_>) -> Result<HydrationReport, LoadError> {
    let doc = parse(json)?;
    grids.clear();
    Ok(hydrate(&doc, grids, engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::placement::PlacementConfig;
    use shared::{Category, Texture};

    #[test]
    fn test_serialize_single_body() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let mut grids = GridSet::new();
        engine
            .place(&mut grids, GridKind::Serifs, 12, &body_key("0_deg", "horizontal"), None)
            .unwrap();

        let doc = serialize(&grids, "one");
        assert_eq!(doc.grids.serifs.shapes.len(), 1);
        let rec = &doc.grids.serifs.shapes[0];
        assert_eq!(rec.cell_index, 12);
        assert_eq!(rec.category, Category::Bodies);
        assert_eq!(rec.angle_bucket.as_str(), "0_deg");
        assert_eq!(rec.shape_name, "horizontal");

        let json = serde_json::to_value(rec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"cellIndex": 12, "category": "bodies", "angleBucket": "0_deg", "shapeName": "horizontal"})
        );
    }

    #[test]
    fn test_multi_cell_recorded_once() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let mut grids = GridSet::new();
        engine
            .place(&mut grids, GridKind::Joins, 0, &join_key("0_deg", "bridge"), None)
            .unwrap();
        let doc = serialize(&grids, "bridge");
        assert_eq!(doc.grids.joins.shapes.len(), 1);
        assert_eq!(doc.grids.joins.shapes[0].cell_index, 0);
        assert_eq!(doc.grids.joins.grid_size, 4);
    }

    #[test]
    fn test_stacked_order_preserved() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let mut grids = GridSet::new();
        for name in ["vertical", "horizontal", "hub"] {
            engine
                .place(&mut grids, GridKind::Serifs, 6, &body_key("0_deg", name), None)
                .unwrap();
        }

        let doc = serialize(&grids, "stack");
        let names: Vec<_> = doc.grids.serifs.shapes.iter().map(|r| r.shape_name.as_str()).collect();
        assert_eq!(names, ["vertical", "horizontal", "hub"]);

        let mut back = GridSet::new();
        let report = hydrate(&doc, &mut back, &engine);
        assert!(report.is_clean());
        let names: Vec<_> = back.serifs.placements().map(|p| p.key.shape_name.clone()).collect();
        assert_eq!(names, ["vertical", "horizontal", "hub"]);
    }

    #[test]
    fn test_hydrate_skips_unknown_and_invalid() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let doc = document_with(
            "partial",
            vec![
                record(12, &body_key("0_deg", "horizontal")),
                record(3, &body_key("0_deg", "missing")),
                record(40, &serif_key("0_deg", "cap")),
            ],
        );

        let mut grids = GridSet::new();
        let report = hydrate(&doc, &mut grids, &engine);
        assert_eq!(report.placed, 1);
        assert_eq!(report.skipped(), 2);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, HydrationWarning::CatalogLookupMiss { cell: 3, .. })));
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, HydrationWarning::InvalidCellIndex { cell: 40, .. })));
    }

    #[test]
    fn test_hydrate_ignores_connection_gate() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::constrained());
        let doc = document_with(
            "loose",
            vec![
                record(12, &body_key("0_deg", "lonely")),
                record(13, &body_key("0_deg", "lonely")),
            ],
        );
        let mut grids = GridSet::new();
        let report = hydrate(&doc, &mut grids, &engine);
        assert_eq!(report.placed, 2);
    }

    #[test]
    fn test_texture_carried() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let mut grids = GridSet::new();
        let tex = Texture::Color("#222222".to_string());
        engine
            .place(&mut grids, GridKind::Serifs, 0, &serif_key("0_deg", "cap"), Some(tex.clone()))
            .unwrap();

        let doc = serialize(&grids, "t");
        let mut back = GridSet::new();
        hydrate(&doc, &mut back, &engine);
        assert_eq!(back.serifs.placements_at(0)[0].texture, Some(tex));
    }

    #[test]
    fn test_load_malformed_applies_nothing() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let mut grids = GridSet::new();
        engine
            .place(&mut grids, GridKind::Serifs, 12, &body_key("0_deg", "horizontal"), None)
            .unwrap();
        let before = grids.clone();

        let err = load_json("{ not json", &mut grids, &engine).unwrap_err();
        assert!(matches!(err, LoadError::MalformedDocument(_)));
        assert_eq!(grids, before);

        // Missing metadata.name is structural too
        let err = load_json(r#"{"metadata": {}, "grids": {}}"#, &mut grids, &engine).unwrap_err();
        assert!(matches!(err, LoadError::MalformedDocument(_)));
        assert_eq!(grids, before);
    }

    #[test]
    fn test_load_replaces_state() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let mut grids = GridSet::new();
        engine
            .place(&mut grids, GridKind::Serifs, 0, &serif_key("0_deg", "cap"), None)
            .unwrap();

        let json = sample_document("A").to_json_pretty().unwrap();
        let report = load_json(&json, &mut grids, &engine).unwrap();
        assert_eq!(report.placed, 3);
        assert!(grids.serifs.placements_at(0).is_empty());
    }
}
