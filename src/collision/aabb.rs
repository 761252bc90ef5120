// Axis-aligned bounding boxes: rectangle bounds, broad-phase rejects and slab raycasts.

use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB, reordering the corners if needed.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered on `center` with the given full extents.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        AABB { min: center - half, max: center + half }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Checks if this AABB strictly overlaps another AABB (touching edges do not count).
    pub fn overlaps(&self, other: &AABB) -> bool {
        let x_overlap = self.max.x > other.min.x && self.min.x < other.max.x;
        let y_overlap = self.max.y > other.min.y && self.min.y < other.max.y;
        x_overlap && y_overlap
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Closest point inside the box to `point`.
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Grows the box by `amount` on every side.
    pub fn expanded(&self, amount: Vec2) -> AABB {
        AABB::new(self.min - amount, self.max + amount)
    }

    /// Merges another AABB into this one, expanding this AABB to contain both.
    pub fn merge(&mut self, other: &AABB) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Box swept from its current position along `displacement`.
    pub fn swept(&self, displacement: Vec2) -> AABB {
        let mut moved = AABB { min: self.min + displacement, max: self.max + displacement };
        moved.merge(self);
        moved
    }

    /// Creates an AABB that encompasses a set of points.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = AABB { min: *first, max: *first };
        for point in rest {
            aabb.min = aabb.min.min(*point);
            aabb.max = aabb.max.max(*point);
        }
        Some(aabb)
    }

    /// Slab test. Returns the entry distance and the entry face normal for a ray
    /// starting at `origin` with unit `direction`, or `None` when the ray misses.
    /// A ray starting inside the box reports distance `0` and a normal facing the ray.
    pub fn ray_intersection(&self, origin: Vec2, direction: Vec2) -> Option<(f64, Vec2)> {
        if self.contains(origin) {
            return Some((0.0, -direction));
        }

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        let mut normal = Vec2::ZERO;

        for (o, d, lo, hi, axis) in [
            (origin.x, direction.x, self.min.x, self.max.x, Vec2::X),
            (origin.y, direction.y, self.min.y, self.max.y, Vec2::Y),
        ] {
            if d.abs() < 1e-12 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t1, t2) = ((lo - o) * inv, (hi - o) * inv);
            let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
            if near > t_min {
                t_min = near;
                normal = if d > 0.0 { -axis } else { axis };
            }
            t_max = t_max.min(far);
        }

        if t_max < 0.0 || t_min > t_max {
            return None;
        }
        Some((t_min, normal))
    }
}
