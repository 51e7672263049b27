//! Collision queries used by the trajectory telegraph.
//!
//! The telegraph only ever needs one question answered: "does the segment
//! from `start` to `end` hit anything on these layers, and where first?".
//! [`SegmentQuery`] is that seam. [`StaticGeometry`] answers it for a fixed
//! set of layered boxes and line segments, which is enough for hosts without
//! a physics engine and for tests.

use leapline_common::{CollisionError, LayerMask, Vec2};
use serde::{Deserialize, Serialize};

/// Tolerance for parallel and degenerate segment tests.
const EPSILON: f32 = 1e-6;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl AABB {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the width of the AABB.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Checks if this AABB overlaps or shares an edge with another.
    #[must_use]
    pub fn touches(&self, other: &AABB) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Returns the AABB translated by a vector.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Fraction along `start -> start + delta` where the segment first enters
    /// this box, using the slab method. A start inside the box enters at 0.
    fn entry_fraction(&self, start: Vec2, delta: Vec2) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for (s, d, lo, hi) in [
            (start.x, delta.x, self.min_x, self.max_x),
            (start.y, delta.y, self.min_y, self.max_y),
        ] {
            if d.abs() < EPSILON {
                if s < lo || s > hi {
                    return None;
                }
                continue;
            }
            let (mut t1, mut t2) = ((lo - s) / d, (hi - s) / d);
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// First intersection along a queried segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentHit {
    /// World-space intersection point
    pub point: Vec2,
    /// Position along the segment, 0 at the start and 1 at the end
    pub fraction: f32,
}

impl SegmentHit {
    /// Builds a hit at `fraction` along `start -> end`.
    #[must_use]
    pub fn along(start: Vec2, end: Vec2, fraction: f32) -> Self {
        Self {
            point: start + (end - start) * fraction,
            fraction,
        }
    }
}

/// Bounded segment cast against collidable surfaces.
///
/// Implementations report the hit closest to `start` among surfaces whose
/// layer is in `mask`, `Ok(None)` when nothing is hit, or an error when the
/// question cannot be answered at all.
pub trait SegmentQuery {
    /// Casts the segment `start -> end`, restricted to `mask`.
    fn cast_segment(
        &self,
        start: Vec2,
        end: Vec2,
        mask: LayerMask,
    ) -> Result<Option<SegmentHit>, CollisionError>;
}

impl<T: SegmentQuery + ?Sized> SegmentQuery for &T {
    fn cast_segment(
        &self,
        start: Vec2,
        end: Vec2,
        mask: LayerMask,
    ) -> Result<Option<SegmentHit>, CollisionError> {
        (**self).cast_segment(start, end, mask)
    }
}

/// A world with nothing to hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySpace;

impl SegmentQuery for EmptySpace {
    fn cast_segment(
        &self,
        _start: Vec2,
        _end: Vec2,
        _mask: LayerMask,
    ) -> Result<Option<SegmentHit>, CollisionError> {
        Ok(None)
    }
}

/// Static collision shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Solid box
    Box(AABB),
    /// Infinitely thin line segment (slopes, one-sided ledges)
    Segment {
        /// First endpoint
        a: Vec2,
        /// Second endpoint
        b: Vec2,
    },
}

impl Shape {
    fn entry_fraction(&self, start: Vec2, end: Vec2) -> Option<f32> {
        match *self {
            Shape::Box(aabb) => aabb.entry_fraction(start, end - start),
            Shape::Segment { a, b } => segment_fraction(start, end, a, b),
        }
    }

    fn touches(&self, probe: &AABB) -> bool {
        match *self {
            Shape::Box(aabb) => aabb.touches(probe),
            Shape::Segment { a, b } => probe.entry_fraction(a, b - a).is_some(),
        }
    }
}

/// A shape assigned to a collision layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Layer index (0-31)
    pub layer: u8,
    /// Geometry
    pub shape: Shape,
}

/// Fixed set of layered colliders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticGeometry {
    colliders: Vec<Collider>,
}

impl StaticGeometry {
    /// Creates empty geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates geometry from a list of colliders.
    #[must_use]
    pub fn from_colliders(colliders: Vec<Collider>) -> Self {
        Self { colliders }
    }

    /// Adds a solid box on `layer`.
    pub fn add_box(&mut self, aabb: AABB, layer: u8) {
        self.colliders.push(Collider {
            layer,
            shape: Shape::Box(aabb),
        });
    }

    /// Adds a line segment on `layer`.
    pub fn add_segment(&mut self, a: Vec2, b: Vec2, layer: u8) {
        self.colliders.push(Collider {
            layer,
            shape: Shape::Segment { a, b },
        });
    }

    /// All colliders, in insertion order.
    #[must_use]
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Number of colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Checks if there are no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Checks if `probe` overlaps or rests against any collider on `mask`.
    ///
    /// Hosts use this as a ground-contact trigger below the body's feet.
    #[must_use]
    pub fn touches(&self, probe: &AABB, mask: LayerMask) -> bool {
        self.colliders
            .iter()
            .filter(|c| mask.includes(c.layer))
            .any(|c| c.shape.touches(probe))
    }
}

impl SegmentQuery for StaticGeometry {
    fn cast_segment(
        &self,
        start: Vec2,
        end: Vec2,
        mask: LayerMask,
    ) -> Result<Option<SegmentHit>, CollisionError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(CollisionError::NonFiniteSegment);
        }

        let nearest = self
            .colliders
            .iter()
            .filter(|c| mask.includes(c.layer))
            .filter_map(|c| c.shape.entry_fraction(start, end))
            .min_by(f32::total_cmp);

        Ok(nearest.map(|fraction| SegmentHit::along(start, end, fraction)))
    }
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Fraction along `p0 -> p1` where it first meets segment `q0 -> q1`.
fn segment_fraction(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> Option<f32> {
    let r = p1 - p0;
    let s = q1 - q0;
    let qp = q0 - p0;
    let denom = cross(r, s);

    // Tolerances are relative to the segment lengths.
    if denom.abs() > EPSILON * r.length() * s.length() {
        let t = cross(qp, s) / denom;
        let u = cross(qp, r) / denom;
        return ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then_some(t);
    }

    // Parallel: only collinear overlap counts.
    if cross(qp, r).abs() > EPSILON * qp.length() * r.length() {
        return None;
    }
    let rr = r.length_squared();
    if rr <= f32::MIN_POSITIVE {
        // Cast is a single point; hit if it lies on the other segment.
        let ss = s.length_squared();
        let on_segment = if ss <= f32::MIN_POSITIVE {
            p0.distance_squared(q0) <= f32::MIN_POSITIVE
        } else {
            let pq = p0 - q0;
            let u = pq.dot(s) / ss;
            (0.0..=1.0).contains(&u) && cross(pq, s).abs() <= EPSILON * pq.length() * s.length()
        };
        return on_segment.then_some(0.0);
    }
    let t0 = qp.dot(r) / rr;
    let t1 = (q1 - p0).dot(r) / rr;
    let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
    if hi < 0.0 || lo > 1.0 {
        return None;
    }
    Some(lo.max(0.0))
}
