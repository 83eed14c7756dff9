//! Collision detection and response between circular bodies
//!
//! Broad phase is a bounding-square test on every pair; the narrow phase
//! checks true circle overlap and resolves it with a 1D restitution impulse
//! along the line of centers plus a mass-weighted push apart.

use super::body::Collidable;
use crate::consts::EPSILON;
use crate::perpendicular;

/// Result of resolving one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// Nothing to do (a body paired with itself)
    None,
    /// Circles overlapped and were resolved
    Resolved {
        /// Penetration depth removed by the positional correction
        overlap: f64,
    },
    /// Bounding squares touched but the circles did not
    FalsePositive,
    /// Centers coincide, so there is no usable normal; pair skipped
    Degenerate,
}

/// Counts of pair outcomes over one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionTally {
    pub resolved: u32,
    pub false_positives: u32,
    pub degenerate: u32,
}

impl CollisionTally {
    fn record(&mut self, outcome: CollisionOutcome) {
        match outcome {
            CollisionOutcome::Resolved { .. } => self.resolved += 1,
            CollisionOutcome::FalsePositive => self.false_positives += 1,
            CollisionOutcome::Degenerate => self.degenerate += 1,
            CollisionOutcome::None => {}
        }
    }
}

/// Broad phase: do the axis-aligned bounding squares intersect?
#[inline]
pub fn bounding_boxes_overlap<A: Collidable, B: Collidable>(a: &A, b: &B) -> bool {
    let reach = a.radius() + b.radius();
    let d = (b.position() - a.position()).abs();
    d.x < reach && d.y < reach
}

/// Normal velocities after a 1D impact with restitution `cr`
///
/// Total momentum `ma·ua + mb·ub` is kept, and the separation speed after the
/// impact is `cr` times the approach speed before it.
#[inline]
pub fn restitution_impulse(ua: f64, ub: f64, ma: f64, mb: f64, cr: f64) -> (f64, f64) {
    let inv_mass = 1.0 / (ma + mb);
    let dvn = ub - ua;
    let pn = ua * ma + ub * mb;
    let va = (pn + dvn * mb * cr) * inv_mass;
    let vb = (pn - dvn * ma * cr) * inv_mass;
    (va, vb)
}

/// Narrow phase and response for one pair
///
/// Mutates both bodies only when the outcome is `Resolved`.
pub fn resolve_pair<A: Collidable, B: Collidable>(a: &mut A, b: &mut B) -> CollisionOutcome {
    if a.id() == b.id() {
        return CollisionOutcome::None;
    }

    let ds = b.position() - a.position();
    let mag2 = ds.length_squared();
    if mag2 < EPSILON * EPSILON {
        log::debug!("bodies {} and {} share a center, skipping", a.id(), b.id());
        return CollisionOutcome::Degenerate;
    }

    let radius_sum = a.radius() + b.radius();
    if mag2 >= radius_sum * radius_sum {
        return CollisionOutcome::FalsePositive;
    }

    let distance = mag2.sqrt();
    let overlap = radius_sum - distance;

    // Unit vector from a toward b, and its tangent
    let normal = ds / distance;
    let tangent = perpendicular(normal);

    let (ma, mb) = (a.mass(), b.mass());
    let cr = a.restitution().min(b.restitution());

    let (ua, ub) = (a.velocity(), b.velocity());
    let (uan, uat) = (ua.dot(normal), ua.dot(tangent));
    let (ubn, ubt) = (ub.dot(normal), ub.dot(tangent));

    let (van, vbn) = restitution_impulse(uan, ubn, ma, mb, cr);

    *a.velocity_mut() = normal * van + tangent * uat;
    *b.velocity_mut() = normal * vbn + tangent * ubt;

    // Heavier bodies move less
    let inv_mass = 1.0 / (ma + mb);
    *a.position_mut() -= normal * (overlap * mb * inv_mass);
    *b.position_mut() += normal * (overlap * ma * inv_mass);

    log::debug!(
        "collide! {} {} at [{:.2},{:.2}], {:.2} overlap",
        a.id(),
        b.id(),
        a.position().x,
        a.position().y,
        overlap
    );

    CollisionOutcome::Resolved { overlap }
}

/// Resolve every overlapping pair once, in slice order
///
/// The slice is expected in ascending id order. Each pair `(i, j)` with
/// `i < j` is visited exactly once; contacts created by an earlier correction
/// in the same pass are not revisited.
pub fn resolve_all<C: Collidable>(bodies: &mut [C]) -> CollisionTally {
    let mut tally = CollisionTally::default();

    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if !bounding_boxes_overlap(a, b) {
                continue;
            }
            tally.record(resolve_pair(a, b));
        }
    }

    tally
}
