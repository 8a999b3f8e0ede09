use egui::{Pos2, Vec2};

/// Axis-aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AaBB {
    pub min: Pos2,
    pub max: Pos2,
}

impl AaBB {
    pub fn from_min_size(min: Pos2, size: Vec2) -> Self {
        AaBB { min, max: min + size }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// boundaries are part of the box
    pub fn contains(&self, p: Pos2) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
    }

    pub fn scale(&self, factor: Vec2) -> Self {
        AaBB {
            min: Pos2::new(self.min.x * factor.x, self.min.y * factor.y),
            max: Pos2::new(self.max.x * factor.x, self.max.y * factor.y),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Pos2,
    pub radius: f32,
}
