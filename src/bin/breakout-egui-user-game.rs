use std::ops::{Add, Div};
use std::sync::{Arc, RwLock};
use std::thread;
use std::thread::JoinHandle;
use std::time::Instant;

use eframe::glow;
use egui::{Align2, Color32, Context, FontId, Id, LayerId, Order, Painter, Vec2};

use breakout_env::environment::breakout::app_game_drawer::AppGameDrawer;
use breakout_env::environment::breakout::breakout_drawer::{BreakoutDrawer, FrameSnapshot};
use breakout_env::environment::breakout::mechanics::{BreakoutMechanics, World, TIME_GRANULARITY};
use breakout_env::environment::breakout_environment::{BreakoutAction, BreakoutEnvironment};
use breakout_env::prelude::Environment;
use breakout_env::util::init_logging;

#[derive(Copy, Clone, Debug)]
pub struct GameInput {
    pub action: BreakoutAction,
    pub exit: bool,
}

impl GameInput {
    pub fn none() -> Self {
        Self {
            action: BreakoutAction::Stay,
            exit: false,
        }
    }
}

/// Publishes every frame to the UI thread
struct SharedFrameDrawer {
    game_state: Arc<RwLock<FrameSnapshot>>,
}

impl BreakoutDrawer for SharedFrameDrawer {
    fn draw(&mut self, frame: &FrameSnapshot) {
        let mut write_handle = self.game_state.write().unwrap();
        *write_handle = frame.clone();
        drop(write_handle);
    }
}

pub struct BreakoutApp {
    game_input: Arc<RwLock<GameInput>>,
    game_state: Arc<RwLock<FrameSnapshot>>,
    mechanics_join_handle: JoinHandle<()>,
}

impl BreakoutApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        game_input: Arc<RwLock<GameInput>>,
        game_state: Arc<RwLock<FrameSnapshot>>,
        mechanics_join_handle: JoinHandle<()>,
    ) -> Self {
        Self {
            game_input,
            game_state,
            mechanics_join_handle,
        }
    }

    fn read_ui_control(
        &mut self,
        ctx: &Context,
    ) -> GameInput {
        let action = if ctx.input(|i| i.key_down(egui::Key::ArrowLeft) && !i.key_down(egui::Key::ArrowRight)) {
            BreakoutAction::Left
        } else if ctx.input(|i| i.key_down(egui::Key::ArrowRight) && !i.key_down(egui::Key::ArrowLeft)) {
            BreakoutAction::Right
        } else {
            BreakoutAction::Stay
        };
        let exit = ctx.input(|i| i.key_down(egui::Key::Escape));
        GameInput { action, exit }
    }

    fn draw_game_content(&self, painter: &Painter) {
        let paint_offset = painter.clip_rect().min;
        let canvas_size = painter.clip_rect().size();

        let game_state = self.read_game_state();
        let drawer = AppGameDrawer::new(canvas_size, game_state);
        for mut shape in drawer.shapes() {
            shape.translate(paint_offset.to_vec2());
            painter.add(shape);
        }
        painter.text(
            paint_offset,
            Align2::LEFT_TOP,
            drawer.score_label(),
            FontId::proportional(25.0),
            Color32::WHITE,
        );
    }

    fn read_game_state(&self) -> FrameSnapshot {
        let read_handle = self.game_state.read().unwrap();
        let game_state = read_handle.clone();
        drop(read_handle);
        game_state
    }

    fn write_game_input(
        &self,
        game_input: GameInput,
    ) {
        let mut write_handle = self.game_input.write().unwrap();
        *write_handle = game_input;
        drop(write_handle);
    }
}

impl eframe::App for BreakoutApp {
    fn update(
        &mut self,
        ctx: &Context,
        frame: &mut eframe::Frame,
    ) {
        if self.mechanics_join_handle.is_finished() {
            frame.close()
        }
        let world = World::default();
        frame.set_window_size(Vec2::new(world.len_x(), world.len_y()));

        let player_input = self.read_ui_control(ctx);
        self.write_game_input(player_input);

        let game_painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("game")));
        self.draw_game_content(&game_painter);
    }

    fn on_exit(
        &mut self,
        _: Option<&glow::Context>,
    ) {
        *self.game_input.write().unwrap() = GameInput {
            action: BreakoutAction::Stay,
            exit: true,
        };
    }
}

/// Steps the environment in real time; the window is only a spectator
fn mechanics_thread(game_input: Arc<RwLock<GameInput>>, game_state: Arc<RwLock<FrameSnapshot>>, egui_ctx: Context) {
    let read_input = || -> GameInput {
        let read_handle = game_input.read().unwrap();
        let input = *read_handle;
        drop(read_handle);
        input
    };

    let mut env = BreakoutEnvironment::with_drawer(World::default(), Box::new(SharedFrameDrawer { game_state }));
    let mut next_step_time = Instant::now().add(TIME_GRANULARITY);
    let sleep_time = TIME_GRANULARITY.div(5);
    loop {
        if Instant::now().ge(&next_step_time) {
            next_step_time = next_step_time.add(TIME_GRANULARITY);
            let input = read_input();
            if input.exit {
                break;
            }
            let (state, reward, done) = env.step(input.action);
            if reward != 0.0 {
                log::debug!("frame {}: reward {}", state.frame(), reward);
            }
            if done {
                log::info!("game over after {} frames; score: {:.2}", state.frame(), state.score());
                break;
            }
            egui_ctx.request_repaint();
        }
        thread::sleep(sleep_time);
    }
}

fn breakout_user_game() -> eframe::Result<()> {
    let game_input = Arc::new(RwLock::new(GameInput::none()));
    let game_state = Arc::new(RwLock::new(BreakoutMechanics::default().snapshot()));

    let m_game_input = Arc::clone(&game_input);
    let m_game_state = Arc::clone(&game_state);

    let mut native_options = eframe::NativeOptions::default();
    native_options.default_theme = eframe::Theme::Dark;
    eframe::run_native("Breakout", native_options, Box::new(|cc| {
        let egui_ctx = cc.egui_ctx.clone();
        let mechanics_join_handle = thread::spawn(move || mechanics_thread(m_game_input, m_game_state, egui_ctx));
        Box::new(BreakoutApp::new(cc, game_input, game_state, mechanics_join_handle))
    }))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    breakout_user_game()?;
    Ok(())
}
