pub mod breakout;
pub mod breakout_environment;
