use std::fmt::{Display, Formatter};

use anyhow::Result;

use crate::environment::breakout::breakout_drawer::BreakoutDrawer;
use crate::environment::breakout::mechanics::{BreakoutMechanics, PaddleControl, World};
use crate::prelude::{Action, EnvError, Environment, ModelActionType};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum BreakoutAction {
    Left,
    Right,
    Stay,
}

impl BreakoutAction {
    /// Decodes a one-hot `[left, right, stay]` action vector as produced by agents.
    /// Anything but exactly one set flag is rejected.
    pub fn try_from_flags(flags: &[u8]) -> Result<Self> {
        match flags {
            [1, 0, 0] => Ok(BreakoutAction::Left),
            [0, 1, 0] => Ok(BreakoutAction::Right),
            [0, 0, 1] => Ok(BreakoutAction::Stay),
            _ => Err(EnvError(format!("invalid action flags {:?}", flags)).into()),
        }
    }
}

impl Action for BreakoutAction {
    const ACTION_SPACE: ModelActionType = 3;

    fn numeric(&self) -> ModelActionType {
        match self {
            BreakoutAction::Left => 0,
            BreakoutAction::Right => 1,
            BreakoutAction::Stay => 2,
        }
    }

    fn try_from_numeric(value: ModelActionType) -> Result<Self> {
        match value {
            0 => Ok(BreakoutAction::Left),
            1 => Ok(BreakoutAction::Right),
            2 => Ok(BreakoutAction::Stay),
            _ => Err(EnvError(format!("invalid action value {}", value)).into()),
        }
    }
}

impl Display for BreakoutAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakoutAction::Left => f.write_str("←"),
            BreakoutAction::Right => f.write_str("→"),
            BreakoutAction::Stay => f.write_str("o"),
        }
    }
}

impl From<BreakoutAction> for PaddleControl {
    fn from(action: BreakoutAction) -> Self {
        match action {
            BreakoutAction::Left => PaddleControl::Left,
            BreakoutAction::Right => PaddleControl::Right,
            BreakoutAction::Stay => PaddleControl::Stay,
        }
    }
}

/// Breakout as a learning environment.
/// Each episode owns its mechanics; run independent instances for parallel episodes.
pub struct BreakoutEnvironment {
    mechanics: BreakoutMechanics,
    drawer: Option<Box<dyn BreakoutDrawer>>,
}

impl BreakoutEnvironment {
    /// headless; steps as fast as the caller wants
    pub fn new(world: World) -> Self {
        Self {
            mechanics: BreakoutMechanics::new(world),
            drawer: None,
        }
    }

    pub fn with_drawer(
        world: World,
        drawer: Box<dyn BreakoutDrawer>,
    ) -> Self {
        let mut env = Self {
            mechanics: BreakoutMechanics::new(world),
            drawer: Some(drawer),
        };
        env.present();
        env
    }

    pub fn score(&self) -> f32 {
        self.mechanics.score()
    }

    fn present(&mut self) {
        if let Some(drawer) = self.drawer.as_mut() {
            drawer.draw(&self.mechanics.snapshot());
        }
    }
}

impl Environment for BreakoutEnvironment {
    type S = BreakoutMechanics;
    type A = BreakoutAction;

    fn reset(&mut self) {
        self.mechanics.reset();
        self.present();
    }

    fn state(&self) -> &Self::S {
        &self.mechanics
    }

    fn step(
        &mut self,
        action: Self::A,
    ) -> (&Self::S, f32, bool) {
        let (reward, done, _score) = self.mechanics.step(action.into());
        self.present();
        (&self.mechanics, reward, done)
    }
}
