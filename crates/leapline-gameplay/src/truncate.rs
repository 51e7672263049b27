//! Cuts a predicted path at its first obstruction.

use leapline_common::{LayerMask, Vec2};
use tracing::{trace, warn};

use crate::physics::SegmentQuery;

/// Walks `points` as consecutive segments and stops at the first hit.
///
/// Every point up to the start of the obstructed segment is kept, the hit
/// point takes the place of that segment's end, and nothing after it is
/// returned. With no hit the output equals the input. A hit at fraction 0
/// still counts.
///
/// A query error is treated as "no hit" for that segment: it is logged and the
/// walk continues with the unobstructed endpoint.
pub fn truncate_at_first_hit<I, Q>(points: I, query: &Q, mask: LayerMask) -> Vec<Vec2>
where
    I: IntoIterator<Item = Vec2>,
    Q: SegmentQuery + ?Sized,
{
    let points = points.into_iter();
    let mut out = Vec::with_capacity(points.size_hint().0);
    truncate_into(&mut out, points, query, mask);
    out
}

/// Same as [`truncate_at_first_hit`], writing into a reused buffer.
///
/// `out` is cleared first. Returns `true` if the path was cut short.
pub fn truncate_into<I, Q>(out: &mut Vec<Vec2>, points: I, query: &Q, mask: LayerMask) -> bool
where
    I: IntoIterator<Item = Vec2>,
    Q: SegmentQuery + ?Sized,
{
    out.clear();
    let mut points = points.into_iter();
    let Some(mut current) = points.next() else {
        return false;
    };
    out.push(current);

    for (index, next) in points.enumerate() {
        match query.cast_segment(current, next, mask) {
            Ok(Some(hit)) => {
                trace!(segment = index, point = ?hit.point, "telegraph obstructed");
                out.push(hit.point);
                return true;
            }
            Ok(None) => {}
            Err(error) => {
                warn!(
                    %error,
                    segment = index,
                    start = ?current,
                    end = ?next,
                    "collision query failed, treating segment as clear"
                );
            }
        }
        out.push(next);
        current = next;
    }
    false
}
