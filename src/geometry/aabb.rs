//! Axis-aligned bounding boxes.

/// Closed box `[min, max]` in each axis.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    /// A degenerate box around one point.
    pub fn from_point(p: [f64; 3]) -> Self {
        Self { min: p, max: p }
    }

    /// The tightest box around `points`, or `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f64; 3]>,
    {
        let mut iter = points.into_iter();
        let mut bb = Self::from_point(*iter.next()?);
        for p in iter {
            bb.expand(*p);
        }
        Some(bb)
    }

    pub fn expand(&mut self, p: [f64; 3]) {
        for k in 0..3 {
            self.min[k] = self.min[k].min(p[k]);
            self.max[k] = self.max[k].max(p[k]);
        }
    }

    pub fn extent(&self) -> [f64; 3] {
        super::sub(self.max, self.min)
    }

    pub fn center(&self) -> [f64; 3] {
        super::lerp(self.min, self.max, 0.5)
    }

    pub fn contains(&self, p: [f64; 3]) -> bool {
        (0..3).all(|k| self.min[k] <= p[k] && p[k] <= self.max[k])
    }
}
