use std::time::Duration;

use anyhow::Result;
use egui::{Pos2, Vec2};
use itertools::iproduct;

use crate::environment::breakout::algebra_2d::{AaBB, Circle};
use crate::environment::breakout::breakout_drawer::FrameSnapshot;
use crate::prelude::{DebugVisualizer, EnvError};

/// TOP / LEFT corner is 0/0
pub const DEFAULT_WORLD_LEN_X: u32 = 800;
pub const DEFAULT_WORLD_LEN_Y: u32 = 600;

const CEILING_Y: f32 = 0.0;

pub const BRICK_LEN_X: f32 = 80.0;
pub const BRICK_LEN_Y: f32 = 30.0;
const BRICKS_SETUP_SPACING: u32 = 5;

pub const PADDLE_LEN_X: f32 = 100.0;
pub const PADDLE_LEN_Y: f32 = 10.0;
/// distance from the paddle's top edge to the bottom of the world
const PADDLE_DISTANCE_BOTTOM: f32 = 20.0;
const PADDLE_SPEED: f32 = 20.0;

pub const BALL_RADIUS: f32 = 10.0;
const BALL_SPEED: f32 = 5.0;

pub const REWARD_BRICK_BROKEN: f32 = 1.0;
pub const REWARD_BALL_BOUNCED: f32 = 10.0;
pub const REWARD_BALL_TOUCHED: f32 = 3.0;
pub const REWARD_BALL_LOST: f32 = -10.0;

/// Real-time pacing for human-watchable presentation.
/// The mechanics don't care; headless training steps as fast as it likes.
pub const FRAME_RATE: u64 = 60;
pub const TIME_GRANULARITY: Duration = Duration::from_nanos(1_000_000_000 / FRAME_RATE);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct World {
    len_x: u32,
    len_y: u32,
}

impl World {
    pub fn new(len_x: u32, len_y: u32) -> Result<Self> {
        if (len_x as f32) < PADDLE_LEN_X {
            return Err(EnvError(format!("world width {len_x} is smaller than the paddle width {PADDLE_LEN_X}")).into());
        }
        if len_y / 3 == 0 {
            return Err(EnvError::from("world height leaves no room for a row of bricks").into());
        }
        Ok(Self { len_x, len_y })
    }

    pub fn len_x(&self) -> f32 { self.len_x as f32 }

    pub fn len_y(&self) -> f32 { self.len_y as f32 }

    pub fn size(&self) -> Vec2 { Vec2::new(self.len_x(), self.len_y()) }
}

impl Default for World {
    fn default() -> Self {
        Self {
            len_x: DEFAULT_WORLD_LEN_X,
            len_y: DEFAULT_WORLD_LEN_Y,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PaddleControl {
    Left,
    Right,
    Stay,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Paddle {
    /// top left corner
    pub pos: Pos2,
}

impl Paddle {
    pub fn shape(&self) -> AaBB {
        AaBB::from_min_size(self.pos, Vec2::new(PADDLE_LEN_X, PADDLE_LEN_Y))
    }

    fn process_input(
        &mut self,
        control: PaddleControl,
        world: &World,
    ) {
        match control {
            PaddleControl::Left => self.pos.x = (self.pos.x - PADDLE_SPEED).max(0.0),
            PaddleControl::Right => self.pos.x = (self.pos.x + PADDLE_SPEED).min(world.len_x() - PADDLE_LEN_X),
            PaddleControl::Stay => (),
        }
    }

    /// the ball's lower edge lies on the paddle
    fn touches(&self, ball: &Ball) -> bool {
        (self.pos.x..=self.pos.x + PADDLE_LEN_X).contains(&ball.pos.x)
            && (self.pos.y..=self.pos.y + PADDLE_LEN_Y).contains(&(ball.pos.y + BALL_RADIUS))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub pos: Pos2,
    pub velocity: Vec2,
}

impl Ball {
    pub fn shape(&self) -> Circle {
        Circle {
            center: self.pos,
            radius: BALL_RADIUS,
        }
    }

    /// Move one time step forward and reflect on the side walls and the ceiling.
    /// The position is not corrected, so the ball may overshoot a wall by up to one step.
    fn proceed(&mut self, world: &World) {
        self.pos += self.velocity;
        if self.pos.x <= 0.0 || self.pos.x >= world.len_x() - BALL_RADIUS {
            self.velocity.x = -self.velocity.x;
        }
        if self.pos.y <= CEILING_Y {
            self.velocity.y = -self.velocity.y;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Brick {
    /// top left corner
    pub pos: Pos2,
}

impl Brick {
    pub fn shape(&self) -> AaBB {
        AaBB::from_min_size(self.pos, Vec2::new(BRICK_LEN_X, BRICK_LEN_Y))
    }
}

#[derive(Clone, Debug)]
pub struct BreakoutMechanics {
    world: World,
    paddle: Paddle,
    ball: Ball,
    /// active bricks; iteration order decides which brick breaks first
    bricks: Vec<Brick>,
    total_bricks: usize,
    /// fraction of broken bricks
    score: f32,
    /// paddle contacts since reset
    hits: u32,
    frame: u64,
}

impl BreakoutMechanics {
    pub fn new(world: World) -> Self {
        let bricks = BreakoutMechanics::initial_bricks(&world);
        Self {
            paddle: BreakoutMechanics::initial_paddle(&world),
            ball: BreakoutMechanics::initial_ball(&world),
            total_bricks: bricks.len(),
            bricks,
            world,
            score: 0.0,
            hits: 0,
            frame: 0,
        }
    }

    /// Bricks are laid out column by column over the full width and the upper third of the world.
    /// The last column may reach beyond the right wall.
    fn initial_bricks(world: &World) -> Vec<Brick> {
        let stride_x = BRICK_LEN_X as usize + BRICKS_SETUP_SPACING as usize;
        let stride_y = BRICK_LEN_Y as usize + BRICKS_SETUP_SPACING as usize;
        iproduct!(
            (0..world.len_x).step_by(stride_x),
            (0..world.len_y / 3).step_by(stride_y)
        )
        .map(|(x, y)| Brick {
            pos: Pos2::new(x as f32, y as f32),
        })
        .collect()
    }

    fn initial_paddle(world: &World) -> Paddle {
        Paddle {
            pos: Pos2::new(
                world.len_x() / 2.0 - PADDLE_LEN_X / 2.0,
                world.len_y() - PADDLE_DISTANCE_BOTTOM,
            ),
        }
    }

    fn initial_ball(world: &World) -> Ball {
        Ball {
            pos: Pos2::new(world.len_x() / 2.0, world.len_y() / 2.0),
            velocity: Vec2::new(BALL_SPEED, -BALL_SPEED),
        }
    }

    /// Starts a new episode in the same world
    pub fn reset(&mut self) {
        *self = BreakoutMechanics::new(self.world);
    }

    /// Physically move one time step forward.
    ///
    /// Returns `(reward, terminal, score)`.
    /// Losing the ball ends the step right away: no brick breaks and no paddle contact counts in that step.
    /// A paddle reward replaces a brick reward earned in the same step.
    pub fn step(
        &mut self,
        control: PaddleControl,
    ) -> (f32, bool, f32) {
        self.frame += 1;
        self.paddle.process_input(control, &self.world);
        self.ball.proceed(&self.world);

        if self.ball.pos.y >= self.world.len_y() {
            log::debug!("frame {}: ball lost at x={}; score {:.2}", self.frame, self.ball.pos.x, self.score);
            return (REWARD_BALL_LOST, true, self.score);
        }

        let mut reward = 0.0;
        if self.break_brick() {
            reward = REWARD_BRICK_BROKEN;
        }

        if self.paddle.touches(&self.ball) {
            self.hits += 1;
            // the very first contact of an episode is never rewarded
            if self.hits > 1 {
                if self.ball.velocity.y > 0.0 {
                    reward = REWARD_BALL_BOUNCED;
                    self.ball.velocity.y = -self.ball.velocity.y;
                } else {
                    reward = REWARD_BALL_TOUCHED;
                }
            }
            log::debug!("frame {}: paddle contact #{}, reward {}", self.frame, self.hits, reward);
        }

        self.score = self.calculate_score();
        log::trace!("{}", self.one_line_info());
        (reward, false, self.score)
    }

    /// removes at most one brick: the first one containing the ball
    fn break_brick(&mut self) -> bool {
        let ball_pos = self.ball.pos;
        match self.bricks.iter().position(|b| b.shape().contains(ball_pos)) {
            Some(idx) => {
                let brick = self.bricks.remove(idx);
                self.ball.velocity.y = -self.ball.velocity.y;
                log::debug!("frame {}: brick at {:?} broken, {} left", self.frame, brick.pos, self.bricks.len());
                true
            }
            None => false,
        }
    }

    fn calculate_score(&self) -> f32 {
        (self.total_bricks - self.bricks.len()) as f32 / self.total_bricks as f32
    }

    pub fn world(&self) -> &World { &self.world }

    pub fn paddle(&self) -> &Paddle { &self.paddle }

    pub fn ball(&self) -> &Ball { &self.ball }

    pub fn bricks(&self) -> &[Brick] { &self.bricks }

    pub fn total_bricks(&self) -> usize { self.total_bricks }

    pub fn score(&self) -> f32 { self.score }

    pub fn hits(&self) -> u32 { self.hits }

    pub fn frame(&self) -> u64 { self.frame }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            world_size: self.world.size(),
            paddle: self.paddle.shape(),
            ball: self.ball.shape(),
            bricks: self.bricks.iter().map(Brick::shape).collect(),
            score: self.score,
        }
    }
}

impl Default for BreakoutMechanics {
    fn default() -> Self {
        BreakoutMechanics::new(World::default())
    }
}

impl DebugVisualizer for BreakoutMechanics {
    fn one_line_info(&self) -> String {
        format!(
            "frame {}: paddle.x={} ball=({}, {}) v=({}, {}) bricks={}/{} hits={} score={:.2}",
            self.frame,
            self.paddle.pos.x,
            self.ball.pos.x,
            self.ball.pos.y,
            self.ball.velocity.x,
            self.ball.velocity.y,
            self.bricks.len(),
            self.total_bricks,
            self.hits,
            self.score
        )
    }
}

#[cfg(test)]
mod tests {
    use egui::{Pos2, Vec2};
    use rstest::rstest;

    use super::*;

    fn mechanics_with_ball(pos: Pos2, velocity: Vec2) -> BreakoutMechanics {
        let mut mechanics = BreakoutMechanics::default();
        mechanics.ball = Ball { pos, velocity };
        mechanics
    }

    #[test]
    fn initial_setup() {
        let mechanics = BreakoutMechanics::default();
        assert_eq!(mechanics.paddle.pos, Pos2::new(350.0, 580.0));
        assert_eq!(mechanics.ball.pos, Pos2::new(400.0, 300.0));
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, -5.0));
        // 10 columns (x = 0, 85, .., 765) with 6 rows each (y = 0, 35, .., 175)
        assert_eq!(mechanics.total_bricks, 60);
        assert_eq!(mechanics.bricks.len(), 60);
        assert_eq!(mechanics.bricks[0].pos, Pos2::new(0.0, 0.0));
        assert_eq!(mechanics.bricks[1].pos, Pos2::new(0.0, 35.0));
        assert_eq!(mechanics.bricks[6].pos, Pos2::new(85.0, 0.0));
        assert_eq!(mechanics.bricks[59].pos, Pos2::new(765.0, 175.0));
        assert_eq!(mechanics.score, 0.0);
        assert_eq!(mechanics.hits, 0);
        assert_eq!(mechanics.frame, 0);
    }

    #[rstest]
    #[case(100, 3, 2)]
    #[case(170, 35, 2)]
    #[case(171, 35, 3)]
    #[case(800, 600, 60)]
    fn brick_count_depends_on_world(#[case] len_x: u32, #[case] len_y: u32, #[case] expected: usize) {
        let mechanics = BreakoutMechanics::new(World::new(len_x, len_y).unwrap());
        assert_eq!(mechanics.total_bricks(), expected);
    }

    #[rstest]
    #[case(99, 600)]
    #[case(0, 600)]
    #[case(800, 2)]
    fn world_too_small(#[case] len_x: u32, #[case] len_y: u32) {
        assert!(World::new(len_x, len_y).is_err());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut mechanics = mechanics_with_ball(Pos2::new(100.0, 170.0), Vec2::new(5.0, -5.0));
        mechanics.hits = 4;
        for _ in 0..10 {
            mechanics.step(PaddleControl::Left);
        }
        assert!(mechanics.bricks.len() < mechanics.total_bricks);

        mechanics.reset();

        let fresh = BreakoutMechanics::default();
        assert_eq!(mechanics.bricks, fresh.bricks);
        assert_eq!(mechanics.paddle, fresh.paddle);
        assert_eq!(mechanics.ball, fresh.ball);
        assert_eq!(mechanics.score, 0.0);
        assert_eq!(mechanics.hits, 0);
        assert_eq!(mechanics.frame, 0);
    }

    #[rstest]
    #[case(350.0, PaddleControl::Left, 330.0)]
    #[case(10.0, PaddleControl::Left, 0.0)]
    #[case(0.0, PaddleControl::Left, 0.0)]
    #[case(350.0, PaddleControl::Right, 370.0)]
    #[case(690.0, PaddleControl::Right, 700.0)]
    #[case(700.0, PaddleControl::Right, 700.0)]
    #[case(350.0, PaddleControl::Stay, 350.0)]
    fn paddle_moves_within_world(#[case] x: f32, #[case] control: PaddleControl, #[case] expected_x: f32) {
        let mut mechanics = BreakoutMechanics::default();
        mechanics.paddle.pos.x = x;
        mechanics.step(control);
        assert_eq!(mechanics.paddle.pos.x, expected_x);
        assert_eq!(mechanics.paddle.pos.y, 580.0);
    }

    #[rstest]
    #[case(Pos2::new(3.0, 300.0), Vec2::new(-5.0, 5.0), Vec2::new(5.0, 5.0))]
    #[case(Pos2::new(5.0, 300.0), Vec2::new(-5.0, 5.0), Vec2::new(5.0, 5.0))]
    #[case(Pos2::new(6.0, 300.0), Vec2::new(-5.0, 5.0), Vec2::new(-5.0, 5.0))]
    #[case(Pos2::new(785.0, 300.0), Vec2::new(5.0, 5.0), Vec2::new(-5.0, 5.0))]
    #[case(Pos2::new(784.0, 300.0), Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0))]
    #[case(Pos2::new(400.0, 300.0), Vec2::new(5.0, -5.0), Vec2::new(5.0, -5.0))]
    fn ball_reflects_on_side_walls(#[case] pos: Pos2, #[case] velocity: Vec2, #[case] expected_velocity: Vec2) {
        let mut mechanics = mechanics_with_ball(pos, velocity);
        let (_, done, _) = mechanics.step(PaddleControl::Stay);
        assert!(!done);
        assert_eq!(mechanics.ball.pos, pos + velocity);
        assert_eq!(mechanics.ball.velocity, expected_velocity);
    }

    #[test]
    fn ball_reflects_exactly_at_ceiling() {
        let mut mechanics = BreakoutMechanics::default();
        mechanics.bricks.clear();

        for _ in 0..59 {
            mechanics.step(PaddleControl::Stay);
        }
        assert_eq!(mechanics.ball.pos, Pos2::new(695.0, 5.0));
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, -5.0));

        let (reward, done, _) = mechanics.step(PaddleControl::Stay);
        assert_eq!(mechanics.ball.pos, Pos2::new(700.0, 0.0));
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, 5.0));
        assert_eq!(reward, 0.0);
        assert!(!done);

        mechanics.step(PaddleControl::Stay);
        assert_eq!(mechanics.ball.pos, Pos2::new(705.0, 5.0));
    }

    #[test]
    fn first_paddle_contact_is_not_rewarded_then_ball_bounces() {
        let mut mechanics = mechanics_with_ball(Pos2::new(400.0, 565.0), Vec2::new(5.0, 5.0));

        let (reward, done, _) = mechanics.step(PaddleControl::Stay);
        assert_eq!(mechanics.hits, 1);
        assert_eq!(reward, 0.0);
        assert!(!done);
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, 5.0));

        let (reward, done, _) = mechanics.step(PaddleControl::Stay);
        assert_eq!(mechanics.hits, 2);
        assert_eq!(reward, REWARD_BALL_BOUNCED);
        assert!(!done);
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, -5.0));

        // still on the paddle, but already on its way up
        let (reward, _, _) = mechanics.step(PaddleControl::Stay);
        assert_eq!(mechanics.hits, 3);
        assert_eq!(reward, REWARD_BALL_TOUCHED);
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, -5.0));

        let (reward, _, _) = mechanics.step(PaddleControl::Stay);
        assert_eq!(mechanics.hits, 3);
        assert_eq!(reward, 0.0);
    }

    #[test]
    fn first_paddle_contact_moving_up_keeps_velocity() {
        let mut mechanics = mechanics_with_ball(Pos2::new(400.0, 575.0), Vec2::new(5.0, -5.0));
        let (reward, _, _) = mechanics.step(PaddleControl::Stay);
        assert_eq!(mechanics.hits, 1);
        assert_eq!(reward, 0.0);
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, -5.0));
    }

    #[rstest]
    #[case(Pos2::new(345.0, 565.0), true)]
    #[case(Pos2::new(445.0, 565.0), true)]
    #[case(Pos2::new(446.0, 565.0), false)]
    #[case(Pos2::new(344.0, 565.0), false)]
    #[case(Pos2::new(400.0, 560.0), false)]
    #[case(Pos2::new(400.0, 575.0), true)]
    #[case(Pos2::new(400.0, 576.0), false)]
    fn paddle_contact_area(#[case] pos: Pos2, #[case] contact: bool) {
        let mut mechanics = mechanics_with_ball(pos, Vec2::new(5.0, 5.0));
        mechanics.step(PaddleControl::Stay);
        assert_eq!(mechanics.hits == 1, contact);
    }

    #[test]
    fn brick_is_broken() {
        let mut mechanics = mechanics_with_ball(Pos2::new(100.0, 175.0), Vec2::new(5.0, -5.0));
        // column 1, row 4
        let target = mechanics.bricks[10].clone();
        assert_eq!(target.pos, Pos2::new(85.0, 140.0));

        let (reward, done, score) = mechanics.step(PaddleControl::Stay);

        assert_eq!(mechanics.ball.pos, Pos2::new(105.0, 170.0));
        assert_eq!(reward, REWARD_BRICK_BROKEN);
        assert!(!done);
        assert_eq!(mechanics.bricks.len(), 59);
        assert!(!mechanics.bricks.contains(&target));
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, 5.0));
        assert_eq!(score, 1.0 / 60.0);
        assert_eq!(mechanics.score, score);
    }

    #[test]
    fn only_first_matching_brick_is_broken() {
        let mut mechanics = mechanics_with_ball(Pos2::new(395.0, 305.0), Vec2::new(5.0, -5.0));
        mechanics.bricks = vec![
            Brick { pos: Pos2::new(390.0, 280.0) },
            Brick { pos: Pos2::new(380.0, 290.0) },
            Brick { pos: Pos2::new(0.0, 0.0) },
        ];
        mechanics.total_bricks = 3;

        let (reward, _, _) = mechanics.step(PaddleControl::Stay);

        assert_eq!(reward, REWARD_BRICK_BROKEN);
        assert_eq!(
            mechanics.bricks,
            vec![Brick { pos: Pos2::new(380.0, 290.0) }, Brick { pos: Pos2::new(0.0, 0.0) }]
        );
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn paddle_reward_replaces_brick_reward() {
        let mut mechanics = mechanics_with_ball(Pos2::new(395.0, 565.0), Vec2::new(5.0, 5.0));
        mechanics.bricks.push(Brick { pos: Pos2::new(350.0, 560.0) });
        mechanics.total_bricks += 1;
        mechanics.hits = 1;

        let (reward, done, score) = mechanics.step(PaddleControl::Stay);

        assert!(!done);
        assert_eq!(mechanics.bricks.len(), 60);
        // brick flipped the ball upwards, so the paddle only touches it
        assert_eq!(reward, REWARD_BALL_TOUCHED);
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, -5.0));
        assert_eq!(mechanics.hits, 2);
        assert_eq!(score, 1.0 / 61.0);
    }

    #[test]
    fn ball_lost_at_bottom_ends_step_immediately() {
        let mut mechanics = mechanics_with_ball(Pos2::new(400.0, 595.0), Vec2::new(5.0, 5.0));
        mechanics.bricks.push(Brick { pos: Pos2::new(380.0, 590.0) });
        mechanics.total_bricks += 1;
        mechanics.bricks.remove(0);
        mechanics.score = mechanics.calculate_score();
        let score_before = mechanics.score;
        let bricks_before = mechanics.bricks.clone();

        let (reward, done, score) = mechanics.step(PaddleControl::Stay);

        assert_eq!(reward, REWARD_BALL_LOST);
        assert!(done);
        assert_eq!(score, score_before);
        assert_eq!(mechanics.bricks, bricks_before);
        assert_eq!(mechanics.ball.pos, Pos2::new(405.0, 600.0));
        assert_eq!(mechanics.ball.velocity, Vec2::new(5.0, 5.0));
        assert_eq!(mechanics.hits, 0);
        assert_eq!(mechanics.frame, 1);
    }

    #[test]
    fn clearing_all_bricks_does_not_end_the_game() {
        let mut mechanics = BreakoutMechanics::default();
        mechanics.bricks.truncate(1);
        mechanics.ball = Ball {
            pos: Pos2::new(5.0, 10.0),
            velocity: Vec2::new(5.0, -5.0),
        };

        let (reward, done, score) = mechanics.step(PaddleControl::Stay);
        assert_eq!(reward, REWARD_BRICK_BROKEN);
        assert!(!done);
        assert_eq!(score, 1.0);
        assert!(mechanics.bricks.is_empty());

        for _ in 0..50 {
            let (_, done, score) = mechanics.step(PaddleControl::Stay);
            assert!(!done);
            assert_eq!(score, 1.0);
        }
    }

    #[test]
    fn snapshot_reflects_state() {
        let mechanics = BreakoutMechanics::default();
        let snapshot = mechanics.snapshot();
        assert_eq!(snapshot.world_size, Vec2::new(800.0, 600.0));
        assert_eq!(snapshot.paddle.min, Pos2::new(350.0, 580.0));
        assert_eq!(snapshot.paddle.max, Pos2::new(450.0, 590.0));
        assert_eq!(snapshot.ball.center, Pos2::new(400.0, 300.0));
        assert_eq!(snapshot.ball.radius, BALL_RADIUS);
        assert_eq!(snapshot.bricks.len(), 60);
        assert_eq!(snapshot.bricks[59].max, Pos2::new(845.0, 205.0));
        assert_eq!(snapshot.score, 0.0);
    }
}
