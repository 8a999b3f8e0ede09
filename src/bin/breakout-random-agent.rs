use anyhow::Result;
use num_format::ToFormattedString;
use rand::Rng;

use breakout_env::environment::breakout::mechanics::World;
use breakout_env::environment::breakout_environment::{BreakoutAction, BreakoutEnvironment};
use breakout_env::prelude::{Action, DebugVisualizer, Environment};
use breakout_env::util::{init_logging, number_format};

pub struct Parameter {
    pub episodes: usize,
    /// clearing all bricks never ends an episode, so we cut it off here
    pub max_steps_per_episode: usize,
    pub stats_after_episodes: usize,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_steps_per_episode: 100_000,
            stats_after_episodes: 10,
        }
    }
}

/// Headless run of a uniformly random policy; shows the environment's throughput and reward signal
fn main() -> Result<()> {
    init_logging();
    let param = Parameter::default();
    let format = number_format()?;

    let mut env = BreakoutEnvironment::new(World::default());
    let mut rng = rand::thread_rng();
    let mut total_steps: usize = 0;
    let mut best_score: f32 = 0.0;

    for episode in 1..=param.episodes {
        env.reset();
        let mut episode_reward = 0.0;
        let mut steps: usize = 0;
        loop {
            let action = BreakoutAction::try_from_numeric(rng.gen_range(0..BreakoutAction::ACTION_SPACE))?;
            let (_, reward, done) = env.step(action);
            episode_reward += reward;
            steps += 1;
            if done || steps >= param.max_steps_per_episode {
                break;
            }
        }
        total_steps += steps;
        best_score = best_score.max(env.score());

        log::debug!("episode {episode}: {}", env.state().one_line_info());
        if episode % param.stats_after_episodes == 0 {
            log::info!(
                "episode {episode}: reward {episode_reward}, frames {}, score {:.2} | best score {:.2}, total frames {}",
                steps.to_formatted_string(&format),
                env.score(),
                best_score,
                total_steps.to_formatted_string(&format)
            );
        }
    }
    Ok(())
}
