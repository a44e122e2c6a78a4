//! Visual offset of a placed shape inside its cell(s).
//!
//! Offsets come from explicit lookup tables keyed by category, rotation bucket
//! and orientation class. Several buckets (67.5°, 112.5°, 135°) carry tuned
//! values that do not follow from the rotation angle, so nothing here is
//! derived trigonometrically.

use serde::Serialize;
use shared::{AngleBucket, CellOrientation, Category, HorizontalAnchor, ShapeDefinition, VerticalAnchor};

/// Translation in percent of one cell edge (+x right, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn scaled(self, sx: f64, sy: f64) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
        }
    }
}

/// Where and how a placement is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Positioning {
    /// Cell the artwork is anchored to (anchor or second footprint cell)
    pub origin_cell: usize,
    /// Alignment inside `origin_cell`
    pub anchor: CellOrientation,
    pub offset: Offset,
}

/// Rotation buckets the tables know about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Deg0,
    Deg22_5,
    Deg45,
    Deg67_5,
    Deg90,
    Deg112_5,
    Deg135,
    Unlisted,
}

impl Rotation {
    pub fn from_bucket(bucket: &AngleBucket) -> Self {
        let Some(deg) = bucket.degrees() else {
            return Rotation::Unlisted;
        };
        const BUCKETS: [(f64, Rotation); 7] = [
            (0.0, Rotation::Deg0),
            (22.5, Rotation::Deg22_5),
            (45.0, Rotation::Deg45),
            (67.5, Rotation::Deg67_5),
            (90.0, Rotation::Deg90),
            (112.5, Rotation::Deg112_5),
            (135.0, Rotation::Deg135),
        ];
        BUCKETS
            .iter()
            .find(|(d, _)| (deg - d).abs() < 1e-6)
            .map(|(_, r)| *r)
            .unwrap_or(Rotation::Unlisted)
    }
}

/// Serif orientation class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerifClass {
    /// Named diagonal serifs running corner to corner
    SpecialDiagonal,
    /// Anchored on one side only (e.g. `top center`)
    Side,
    Regular,
}

impl SerifClass {
    pub fn of(shape: &ShapeDefinition) -> Self {
        if is_special_diagonal(&shape.name) {
            SerifClass::SpecialDiagonal
        } else if shape.cell_orientation.off_center_axes() == 1 {
            SerifClass::Side
        } else {
            SerifClass::Regular
        }
    }
}

/// Serif names that run corner to corner
pub fn is_special_diagonal(name: &str) -> bool {
    name.starts_with("diagonal") || name.starts_with("corner_to_corner")
}

/// Body orientation class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyClass {
    Centered,
    Edge,
    Corner,
}

impl BodyClass {
    pub fn of(orientation: &CellOrientation) -> Self {
        match orientation.off_center_axes() {
            0 => BodyClass::Centered,
            1 => BodyClass::Edge,
            _ => BodyClass::Corner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSpan {
    Single,
    Double,
}

/// Compute the positioning of a shape occupying `cells` (anchor first)
pub fn position(category: Category, bucket: &AngleBucket, shape: &ShapeDefinition, cells: &[usize]) -> Positioning {
    let rotation = Rotation::from_bucket(bucket);
    let orientation = shape.cell_orientation;
    let anchor_cell = cells.first().copied().unwrap_or_default();

    match category {
        Category::Serifs => Positioning {
            origin_cell: anchor_cell,
            anchor: orientation,
            offset: serif_offset(rotation, SerifClass::of(shape), &orientation),
        },
        Category::Bodies => Positioning {
            origin_cell: anchor_cell,
            anchor: orientation,
            offset: body_offset(rotation, BodyClass::of(&orientation), &orientation),
        },
        Category::Joins => {
            let span = if cells.len() > 1 {
                JoinSpan::Double
            } else {
                JoinSpan::Single
            };
            let origin_cell = join_origin(shape, cells);
            Positioning {
                origin_cell,
                anchor: orientation,
                offset: join_offset(span, rotation, shape, &orientation),
            }
        }
    }
}

fn signs(orientation: &CellOrientation) -> (f64, f64) {
    (orientation.horizontal.sign(), orientation.vertical.sign())
}

/// Serif table
fn serif_offset(rotation: Rotation, class: SerifClass, orientation: &CellOrientation) -> Offset {
    let (sx, sy) = signs(orientation);
    match class {
        SerifClass::Side => {
            // Outward along the axis perpendicular to the anchored side
            let outward = match rotation {
                Rotation::Deg22_5 => 12.5,
                Rotation::Deg45 => 9.0,
                Rotation::Deg67_5 => 6.5,
                Rotation::Deg112_5 => 7.25,
                Rotation::Deg135 => 9.0,
                Rotation::Deg0 | Rotation::Deg90 | Rotation::Unlisted => 0.0,
            };
            Offset::new(outward, outward).scaled(sx, sy)
        }
        SerifClass::Regular => {
            let base = match rotation {
                Rotation::Deg22_5 => Offset::new(4.0, 9.5),
                Rotation::Deg45 => Offset::new(7.0, 7.0),
                Rotation::Deg67_5 => Offset::new(10.5, 3.0),
                Rotation::Deg112_5 => Offset::new(8.0, -2.5),
                Rotation::Deg135 => Offset::new(5.5, 5.5),
                Rotation::Deg0 | Rotation::Deg90 | Rotation::Unlisted => Offset::ZERO,
            };
            base.scaled(sx, sy)
        }
        SerifClass::SpecialDiagonal => {
            // Corner-to-corner artwork shifts along its diagonal even when
            // centered, so a centered axis counts as positive.
            let sx = if sx == 0.0 { 1.0 } else { sx };
            let sy = if sy == 0.0 { 1.0 } else { sy };
            let base = match rotation {
                Rotation::Deg22_5 => Offset::new(-6.0, 14.5),
                Rotation::Deg67_5 => Offset::new(14.5, -6.0),
                Rotation::Deg112_5 => Offset::new(12.0, 8.5),
                Rotation::Deg135 => Offset::new(-3.5, -3.5),
                Rotation::Deg0 | Rotation::Deg45 | Rotation::Deg90 | Rotation::Unlisted => Offset::ZERO,
            };
            base.scaled(sx, sy)
        }
    }
}

/// Body table
fn body_offset(rotation: Rotation, class: BodyClass, orientation: &CellOrientation) -> Offset {
    let (sx, sy) = signs(orientation);
    match class {
        BodyClass::Centered => match rotation {
            Rotation::Deg22_5 => Offset::new(0.0, -1.5),
            Rotation::Deg67_5 => Offset::new(1.5, 0.0),
            Rotation::Deg112_5 => Offset::new(-1.5, 0.5),
            _ => Offset::ZERO,
        },
        BodyClass::Edge => {
            let outward = match rotation {
                Rotation::Deg22_5 => 3.5,
                Rotation::Deg45 => 2.0,
                Rotation::Deg67_5 => 3.0,
                Rotation::Deg112_5 => 5.0,
                Rotation::Deg135 => 2.0,
                Rotation::Deg0 | Rotation::Deg90 | Rotation::Unlisted => 0.0,
            };
            Offset::new(outward, outward).scaled(sx, sy)
        }
        BodyClass::Corner => {
            let base = match rotation {
                Rotation::Deg22_5 => Offset::new(1.5, 3.0),
                Rotation::Deg45 => Offset::new(2.5, 2.5),
                Rotation::Deg67_5 => Offset::new(3.0, 1.5),
                Rotation::Deg112_5 => Offset::new(4.0, 1.0),
                Rotation::Deg135 => Offset::new(2.5, 2.5),
                Rotation::Deg0 | Rotation::Deg90 | Rotation::Unlisted => Offset::ZERO,
            };
            base.scaled(sx, sy)
        }
    }
}

/// Multi-cell joins draw from the far cell when their orientation points
/// there: `bottom` for a tall join, `right` for a wide one.
fn join_origin(shape: &ShapeDefinition, cells: &[usize]) -> usize {
    let anchor = cells.first().copied().unwrap_or_default();
    let Some(&second) = cells.get(1) else {
        return anchor;
    };
    let far_end = if shape.height > 1 {
        shape.cell_orientation.vertical == VerticalAnchor::Bottom
    } else {
        shape.cell_orientation.horizontal == HorizontalAnchor::Right
    };
    if far_end {
        second
    } else {
        anchor
    }
}

/// Join sub-table keyed by span and rotation
fn join_offset(span: JoinSpan, rotation: Rotation, shape: &ShapeDefinition, orientation: &CellOrientation) -> Offset {
    match span {
        JoinSpan::Single => match rotation {
            Rotation::Deg22_5 => Offset::new(0.0, -2.0),
            Rotation::Deg67_5 => Offset::new(2.0, 0.0),
            Rotation::Deg112_5 => Offset::new(-2.0, 1.0),
            Rotation::Deg135 => Offset::new(-1.0, -1.0),
            _ => Offset::ZERO,
        },
        JoinSpan::Double => {
            // A join centered along its long axis straddles the boundary
            let straddle = if shape.height > 1 {
                if orientation.vertical == VerticalAnchor::Center {
                    Offset::new(0.0, 50.0)
                } else {
                    Offset::ZERO
                }
            } else if orientation.horizontal == HorizontalAnchor::Center {
                Offset::new(50.0, 0.0)
            } else {
                Offset::ZERO
            };
            let tuned = match rotation {
                Rotation::Deg22_5 => Offset::new(-3.0, 0.0),
                Rotation::Deg45 => Offset::new(2.5, 2.5),
                Rotation::Deg67_5 => Offset::new(0.0, -3.0),
                Rotation::Deg112_5 => Offset::new(0.0, 4.5),
                Rotation::Deg135 => Offset::new(-2.5, 2.5),
                Rotation::Deg0 | Rotation::Deg90 | Rotation::Unlisted => Offset::ZERO,
            };
            Offset::new(straddle.x + tuned.x, straddle.y + tuned.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(name: &str, width: u8, height: u8, orientation: &str) -> ShapeDefinition {
        ShapeDefinition {
            name: name.to_string(),
            width,
            height,
            cell_orientation: orientation.parse().unwrap(),
            allowed_connection_points: Default::default(),
            svg: String::new(),
        }
    }

    #[test]
    fn test_rotation_from_bucket() {
        assert_eq!(Rotation::from_bucket(&AngleBucket::from("0_deg")), Rotation::Deg0);
        assert_eq!(Rotation::from_bucket(&AngleBucket::from("67_5_deg")), Rotation::Deg67_5);
        assert_eq!(Rotation::from_bucket(&AngleBucket::from("135°")), Rotation::Deg135);
        assert_eq!(Rotation::from_bucket(&AngleBucket::from("30_deg")), Rotation::Unlisted);
    }

    #[test]
    fn test_serif_classes() {
        assert_eq!(SerifClass::of(&shape("diagonal_tl", 1, 1, "top left")), SerifClass::SpecialDiagonal);
        assert_eq!(SerifClass::of(&shape("flag", 1, 1, "top center")), SerifClass::Side);
        assert_eq!(SerifClass::of(&shape("flag", 1, 1, "bottom right")), SerifClass::Regular);
    }

    #[test]
    fn test_side_serif_pushed_outward() {
        let top = shape("flag", 1, 1, "top");
        let p = position(Category::Serifs, &AngleBucket::from("22_5_deg"), &top, &[7]);
        assert_eq!(p.origin_cell, 7);
        assert_eq!(p.offset, Offset { x: 0.0, y: -12.5 });

        let bottom = shape("flag", 1, 1, "bottom");
        let p = position(Category::Serifs, &AngleBucket::from("22_5_deg"), &bottom, &[7]);
        assert_eq!(p.offset, Offset { x: 0.0, y: 12.5 });
    }

    #[test]
    fn test_special_diagonal_uses_own_table() {
        let diag = shape("diagonal_a", 1, 1, "top");
        let regular = shape("hook", 1, 1, "top");
        let bucket = AngleBucket::from("22_5_deg");
        let d = position(Category::Serifs, &bucket, &diag, &[0]);
        let r = position(Category::Serifs, &bucket, &regular, &[0]);
        assert_ne!(d.offset, r.offset);
        assert_eq!(d.offset, Offset { x: -6.0, y: -14.5 });
    }

    #[test]
    fn test_unlisted_bucket_has_no_offset() {
        let s = shape("flag", 1, 1, "top");
        let p = position(Category::Serifs, &AngleBucket::from("weird"), &s, &[3]);
        assert_eq!(p.offset, Offset::ZERO);
    }

    #[test]
    fn test_tall_join_origin_follows_orientation() {
        let bottom = shape("stem", 1, 2, "bottom center");
        let p = position(Category::Joins, &AngleBucket::from("90_deg"), &bottom, &[1, 5]);
        assert_eq!(p.origin_cell, 5);

        let top = shape("stem", 1, 2, "top center");
        let p = position(Category::Joins, &AngleBucket::from("90_deg"), &top, &[1, 5]);
        assert_eq!(p.origin_cell, 1);
    }

    #[test]
    fn test_centered_wide_join_straddles() {
        let s = shape("bridge", 2, 1, "center center");
        let p = position(Category::Joins, &AngleBucket::from("0_deg"), &s, &[0, 1]);
        assert_eq!(p.origin_cell, 0);
        assert_eq!(p.offset, Offset { x: 50.0, y: 0.0 });
    }

    #[test]
    fn test_centered_body_at_zero_has_no_offset() {
        let s = shape("horizontal", 1, 1, "center center");
        let p = position(Category::Bodies, &AngleBucket::from("0_deg"), &s, &[12]);
        assert_eq!(p.offset, Offset::ZERO);
        assert_eq!(p.anchor, CellOrientation::CENTER);
    }
}
