use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use breakout_env::environment::breakout_environment::BreakoutAction;
use breakout_env::prelude::Action;

pub const SEED: u64 = 0x0b_2e_a4_00;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

/// one-hot `[left, right, stay]` vector as a learning agent would emit it
pub fn random_action_flags(rng: &mut StdRng) -> [u8; 3] {
    let mut flags = [0; 3];
    flags[rng.gen_range(0..BreakoutAction::ACTION_SPACE) as usize] = 1;
    flags
}
