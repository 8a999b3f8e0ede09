use egui::epaint::{CircleShape, RectShape};
use egui::{Color32, Pos2, Rect, Rounding, Shape, Vec2};

use super::algebra_2d::{AaBB, Circle};
use super::breakout_drawer::FrameSnapshot;

const BACKGROUND_COLOR: Color32 = Color32::BLACK;
const BRICK_COLOR: Color32 = Color32::WHITE;
const PADDLE_COLOR: Color32 = Color32::from_rgb(0, 0, 255);
const BALL_COLOR: Color32 = Color32::from_rgb(200, 0, 0);

/// Turns a [FrameSnapshot] into egui shapes, scaled to the canvas
pub struct AppGameDrawer {
    canvas_size: Vec2,
    frame: FrameSnapshot,
}

impl AppGameDrawer {
    pub fn new(
        canvas_size: Vec2,
        frame: FrameSnapshot,
    ) -> Self {
        Self { canvas_size, frame }
    }

    /// pos / WORLD_LEN = result / canvas_size
    /// => result = pos * canvas_size / WORLD_LEN
    fn scale(
        &self,
        pos: Pos2,
    ) -> Pos2 {
        Pos2::new(
            pos.x * self.canvas_size.x / self.frame.world_size.x,
            pos.y * self.canvas_size.y / self.frame.world_size.y,
        )
    }

    fn scale_x(
        &self,
        len_x: f32,
    ) -> f32 {
        len_x * self.canvas_size.x / self.frame.world_size.x
    }

    pub fn shapes(&self) -> Vec<Shape> {
        let mut result = Vec::with_capacity(self.frame.bricks.len() + 3);
        result.push(self.background());
        result.extend(self.frame.bricks.iter().map(|b| self.draw_rect(b, BRICK_COLOR)));
        result.push(self.draw_rect(&self.frame.paddle, PADDLE_COLOR));
        result.push(self.draw_ball(&self.frame.ball));
        result
    }

    pub fn score_label(&self) -> String {
        format!("Score: {:.2}", self.frame.score)
    }

    fn background(&self) -> Shape {
        RectShape::filled(
            Rect::from_min_size(Pos2::ZERO, self.canvas_size),
            Rounding::none(),
            BACKGROUND_COLOR,
        )
        .into()
    }

    fn draw_ball(
        &self,
        ball: &Circle,
    ) -> Shape {
        CircleShape::filled(self.scale(ball.center), self.scale_x(ball.radius), BALL_COLOR).into()
    }

    fn draw_rect(
        &self,
        aabb: &AaBB,
        color: Color32,
    ) -> Shape {
        RectShape::filled(
            Rect::from_two_pos(self.scale(aabb.min), self.scale(aabb.max)),
            Rounding::none(),
            color,
        )
        .into()
    }
}
