use egui::Vec2;
use image::{Rgb, RgbImage};

use crate::environment::breakout::algebra_2d::{AaBB, Circle};
use crate::environment::breakout::breakout_drawer::{BreakoutDrawer, FrameSnapshot};

const BACKGROUND_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const BRICK_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const PADDLE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const BALL_COLOR: Rgb<u8> = Rgb([200, 0, 0]);

/// Rasterizes frames into RGB images, e.g. as pixel input for a learning agent
pub struct ImageFrameDrawer {
    frame_size_x: u32,
    frame_size_y: u32,
    last_frame: Option<RgbImage>,
}

impl ImageFrameDrawer {
    pub fn new(frame_size_x: u32, frame_size_y: u32) -> Self {
        Self {
            frame_size_x,
            frame_size_y,
            last_frame: None,
        }
    }

    pub fn last_frame(&self) -> Option<&RgbImage> {
        self.last_frame.as_ref()
    }

    pub fn render(&self, frame: &FrameSnapshot) -> RgbImage {
        let scale = Vec2::new(
            self.frame_size_x as f32 / frame.world_size.x,
            self.frame_size_y as f32 / frame.world_size.y,
        );
        let mut image = RgbImage::from_pixel(self.frame_size_x, self.frame_size_y, BACKGROUND_COLOR);
        for brick in &frame.bricks {
            fill_rect(&mut image, &brick.scale(scale), BRICK_COLOR);
        }
        fill_rect(&mut image, &frame.paddle.scale(scale), PADDLE_COLOR);
        fill_circle(&mut image, &frame.ball, scale, BALL_COLOR);
        image
    }
}

impl BreakoutDrawer for ImageFrameDrawer {
    fn draw(&mut self, frame: &FrameSnapshot) {
        self.last_frame = Some(self.render(frame));
    }
}

/// pixels are clipped to the image
fn fill_rect(
    image: &mut RgbImage,
    rect: &AaBB,
    color: Rgb<u8>,
) {
    let (width, height) = image.dimensions();
    // `as u32` saturates negative coordinates to 0
    let x_range = (rect.min.x.floor() as u32)..(rect.max.x.ceil() as u32).min(width);
    let y_range = (rect.min.y.floor() as u32)..(rect.max.y.ceil() as u32).min(height);
    for y in y_range {
        for x in x_range.clone() {
            image.put_pixel(x, y, color);
        }
    }
}

/// A pixel belongs to the circle when its center does
fn fill_circle(
    image: &mut RgbImage,
    circle: &Circle,
    scale: Vec2,
    color: Rgb<u8>,
) {
    let bounds = AaBB {
        min: circle.center - Vec2::splat(circle.radius),
        max: circle.center + Vec2::splat(circle.radius),
    }
    .scale(scale);
    let (width, height) = image.dimensions();
    for y in (bounds.min.y.floor() as u32)..(bounds.max.y.ceil() as u32).min(height) {
        for x in (bounds.min.x.floor() as u32)..(bounds.max.x.ceil() as u32).min(width) {
            let dx = (x as f32 + 0.5) / scale.x - circle.center.x;
            let dy = (y as f32 + 0.5) / scale.y - circle.center.y;
            if dx * dx + dy * dy <= circle.radius * circle.radius {
                image.put_pixel(x, y, color);
            }
        }
    }
}
