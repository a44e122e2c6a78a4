//! Placement, connection and round-trip properties over the fixture catalog.

use freebuilder_lib::connection::ConnectionValidator;
use freebuilder_lib::fixtures::{body_key, join_key, serif_key, test_catalog};
use freebuilder_lib::serializer::{hydrate, serialize};
use freebuilder_lib::{Grid, GridSet, PlaceError, PlacementConfig, PlacementEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Category, ConnectionPoints, GridKind, ShapeCatalog, ShapeDefinition, ShapeKey};

#[test]
fn test_scenario_single_body_at_centre() {
    let catalog = test_catalog();
    let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
    let mut grids = GridSet::new();

    let outcome = engine
        .place(&mut grids, GridKind::Serifs, 12, &body_key("0_deg", "horizontal"), None)
        .unwrap();
    assert_eq!(outcome.cells, vec![12]);
    assert!(outcome.cleared.is_empty());
    assert_eq!(grids.serifs.placements_at(12).len(), 1);

    let doc = serialize(&grids, "centre");
    let records = serde_json::to_value(&doc.grids.serifs.shapes).unwrap();
    assert_eq!(
        records,
        serde_json::json!([{"cellIndex": 12, "category": "bodies", "angleBucket": "0_deg", "shapeName": "horizontal"}])
    );
}

#[test]
fn test_scenario_wide_join_erase_from_either_cell() {
    let catalog = test_catalog();
    let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
    let bridge = join_key("0_deg", "bridge");

    for erase_at in [0, 1] {
        let mut grids = GridSet::new();
        let outcome = engine
            .place(&mut grids, GridKind::Joins, 0, &bridge, None)
            .unwrap();
        assert_eq!(outcome.cells, vec![0, 1]);

        let removed = engine.erase(&mut grids, GridKind::Joins, erase_at, Category::Joins);
        assert_eq!(removed.len(), 1, "erase via cell {erase_at}");
        assert!(grids.joins.cell_at(0).unwrap().is_empty());
        assert!(grids.joins.cell_at(1).unwrap().is_empty());
    }
}

#[test]
fn test_scenario_constrained_rejection() {
    let catalog = test_catalog();
    let engine = PlacementEngine::new(&catalog, PlacementConfig::constrained());
    let mut grids = GridSet::new();
    engine
        .place(&mut grids, GridKind::Serifs, 12, &body_key("0_deg", "shape_a"), None)
        .unwrap();
    let before = grids.clone();

    let validator = ConnectionValidator::new(&catalog);
    assert!(!validator.validate(&grids.serifs, 13, &body_key("0_deg", "shape_b")));

    let err = engine
        .place(&mut grids, GridKind::Serifs, 13, &body_key("0_deg", "shape_b"), None)
        .unwrap_err();
    assert!(matches!(err, PlaceError::ConstraintViolation(_)));
    assert_eq!(grids, before);
}

#[test]
fn test_grid_kind_gate_every_cell() {
    let catalog = test_catalog();
    let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
    let mut grids = GridSet::new();

    for cell in 0..16 {
        for key in [body_key("0_deg", "hub"), serif_key("0_deg", "cap")] {
            assert!(matches!(
                engine.place(&mut grids, GridKind::Joins, cell, &key, None),
                Err(PlaceError::WrongGridKind { .. })
            ));
        }
    }
    for cell in 0..25 {
        assert!(matches!(
            engine.place(&mut grids, GridKind::Serifs, cell, &join_key("45_deg", "link"), None),
            Err(PlaceError::WrongGridKind { .. })
        ));
    }
    assert!(grids.is_empty());
}

#[test]
fn test_footprint_validity_matches_bounds() {
    let catalog = test_catalog();
    let wide = catalog.lookup(&join_key("0_deg", "bridge")).unwrap();
    let tall = catalog.lookup(&join_key("90_deg", "stem")).unwrap();

    for kind in [GridKind::Serifs, GridKind::Joins] {
        let grid = Grid::new(kind);
        let g = grid.size();
        for row in 0..g {
            for col in 0..g {
                let anchor = row * g + col;
                let wide_ok = PlacementEngine::compute_footprint(&grid, anchor, wide)
                    .iter()
                    .all(Option::is_some);
                let tall_ok = PlacementEngine::compute_footprint(&grid, anchor, tall)
                    .iter()
                    .all(Option::is_some);
                assert_eq!(wide_ok, col + 1 < g);
                assert_eq!(tall_ok, row + 1 < g);
            }
        }
    }
}

#[test]
fn test_overlap_policy() {
    let catalog = test_catalog();
    let engine = PlacementEngine::new(&catalog, PlacementConfig::free());

    let mut grids = GridSet::new();
    engine
        .place(&mut grids, GridKind::Serifs, 8, &body_key("0_deg", "horizontal"), None)
        .unwrap();
    engine
        .place(&mut grids, GridKind::Serifs, 8, &body_key("0_deg", "vertical"), None)
        .unwrap();
    assert_eq!(grids.serifs.placements_at(8).len(), 2);

    let mut grids = GridSet::new();
    engine
        .place(&mut grids, GridKind::Serifs, 8, &serif_key("0_deg", "cap"), None)
        .unwrap();
    engine
        .place(&mut grids, GridKind::Serifs, 8, &serif_key("22_5_deg", "diagonal_sweep"), None)
        .unwrap();
    let kept = grids.serifs.placements_at(8);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].key, serif_key("22_5_deg", "diagonal_sweep"));

    // Single-cell joins overlay too
    let mut grids = GridSet::new();
    engine
        .place(&mut grids, GridKind::Joins, 5, &join_key("45_deg", "link"), None)
        .unwrap();
    engine
        .place(&mut grids, GridKind::Joins, 5, &join_key("45_deg", "link"), None)
        .unwrap();
    assert_eq!(grids.joins.placements_at(5).len(), 2);
}

fn body(name: &str, points: &str) -> ShapeDefinition {
    ShapeDefinition {
        name: name.to_string(),
        width: 1,
        height: 1,
        cell_orientation: Default::default(),
        allowed_connection_points: ConnectionPoints::parse(points).unwrap(),
        svg: String::new(),
    }
}

#[test]
fn test_connection_symmetry() {
    let a = ShapeKey::new(Category::Bodies, "0_deg", "a");
    let b = ShapeKey::new(Category::Bodies, "45_deg", "b");

    let verdict = |a_points: &str, b_points: &str| {
        let mut catalog = ShapeCatalog::default();
        catalog.insert(Category::Bodies, "0_deg", body("a", a_points));
        catalog.insert(Category::Bodies, "45_deg", body("b", b_points));
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let mut grids = GridSet::new();
        engine
            .place(&mut grids, GridKind::Serifs, 12, &a, None)
            .unwrap();
        ConnectionValidator::new(&catalog).validate(&grids.serifs, 13, &b)
    };

    assert!(verdict("right *", "left 0_deg"));
    assert!(verdict("right 45_deg.b", "left 0_deg.*"));
    // Flip either side
    assert!(!verdict("right 90_deg", "left 0_deg"));
    assert!(!verdict("right *", "left 45_deg"));
    assert!(!verdict("left *", "left 0_deg"));
    assert!(!verdict("right *", "right 0_deg"));
}

#[test]
fn test_constrained_connections_in_dotted_buckets() {
    let mut catalog = ShapeCatalog::default();
    catalog.insert(Category::Bodies, "22.5°", body("a", "right 22.5°.*, left 67.5°.b"));
    catalog.insert(Category::Bodies, "67.5°", body("b", "left 22.5°.a, right 22.5°"));
    let a = ShapeKey::new(Category::Bodies, "22.5°", "a");
    let b = ShapeKey::new(Category::Bodies, "67.5°", "b");

    let engine = PlacementEngine::new(&catalog, PlacementConfig::constrained());
    let mut grids = GridSet::new();
    engine.place(&mut grids, GridKind::Serifs, 12, &a, None).unwrap();
    // a only accepts 22.5° shapes on its right
    assert!(matches!(
        engine.place(&mut grids, GridKind::Serifs, 13, &b, None),
        Err(PlaceError::ConstraintViolation(_))
    ));
    engine.place(&mut grids, GridKind::Serifs, 11, &b, None).unwrap();
    assert_eq!(grids.placement_count(), 2);
}

#[test]
fn test_constrained_place_over_wide_join() {
    let catalog = test_catalog();
    let engine = PlacementEngine::new(&catalog, PlacementConfig::constrained());
    let mut grids = GridSet::new();
    engine
        .place(&mut grids, GridKind::Joins, 1, &join_key("0_deg", "bridge"), None)
        .unwrap();

    // link declares no left connection, but the bridge it sits on is cleared
    let outcome = engine
        .place(&mut grids, GridKind::Joins, 2, &join_key("45_deg", "link"), None)
        .unwrap();
    assert_eq!(outcome.cleared.len(), 1);
    assert_eq!(grids.joins.placement_count(), 1);
    assert!(grids.joins.cell_at(1).unwrap().is_empty());
}

#[test]
fn test_cross_grid_neighbours_ignored() {
    let catalog = test_catalog();
    let engine = PlacementEngine::new(&catalog, PlacementConfig::constrained());
    let mut grids = GridSet::new();
    engine
        .place(&mut grids, GridKind::Serifs, 12, &body_key("0_deg", "lonely"), None)
        .unwrap();
    // Joins cell 5 overlays serifs 12 visually, but grids are validated apart
    engine
        .place(&mut grids, GridKind::Joins, 5, &join_key("45_deg", "link"), None)
        .unwrap();
}

#[test]
fn test_round_trip_after_random_edits() {
    let catalog = test_catalog();
    let keys: Vec<ShapeKey> = catalog.iter().map(|(k, _)| k).collect();
    let engine = PlacementEngine::new(&catalog, PlacementConfig::free());

    for seed in 1..=20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grids = GridSet::new();

        for _ in 0..40 {
            let key = &keys[rng.random_range(0..keys.len())];
            let kind = key.category.grid_kind();
            let cell = rng.random_range(0..kind.cell_count());
            if rng.random_ratio(1, 4) {
                engine.erase(&mut grids, kind, cell, key.category);
            } else {
                // Out-of-bounds attempts are part of the mix
                let _ = engine.place(&mut grids, kind, cell, key, None);
            }
        }

        let doc = serialize(&grids, "random");
        let json = doc.to_json_pretty().unwrap();
        let reloaded = shared::CompositionDocument::from_json(&json).unwrap();

        let mut back = GridSet::new();
        let report = hydrate(&reloaded, &mut back, &engine);
        assert!(report.is_clean(), "seed {seed}: {:?}", report.warnings);
        assert_eq!(back.shape_tuples(), grids.shape_tuples(), "seed {seed}");
    }
}

#[test]
fn test_round_trip_in_strict_mode() {
    let catalog = test_catalog();
    let free = PlacementEngine::new(&catalog, PlacementConfig::free());
    let strict = PlacementEngine::new(
        &catalog,
        PlacementConfig {
            constrained: false,
            strict_clearing: true,
        },
    );

    let mut grids = GridSet::new();
    free.place(&mut grids, GridKind::Serifs, 4, &body_key("0_deg", "horizontal"), None)
        .unwrap();
    free.place(&mut grids, GridKind::Serifs, 4, &body_key("0_deg", "vertical"), None)
        .unwrap();

    // First record clears, the rest overlay, so stacks survive strict replay
    let mut back = GridSet::new();
    hydrate(&serialize(&grids, "s"), &mut back, &strict);
    assert_eq!(back.shape_tuples(), grids.shape_tuples());
}
