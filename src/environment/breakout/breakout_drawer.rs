use egui::Vec2;

use crate::environment::breakout::algebra_2d::{AaBB, Circle};

/// Read-only picture of the game world at the end of one time step.
///
/// Everything a presentation layer needs and nothing more. Drawers never see the
/// mechanics themselves, so they cannot feed anything back into the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub world_size: Vec2,
    pub paddle: AaBB,
    pub ball: Circle,
    pub bricks: Vec<AaBB>,
    pub score: f32,
}

/// Presentation layer hook; called by the environment after each reset and step
pub trait BreakoutDrawer {
    fn draw(&mut self, frame: &FrameSnapshot);
}
