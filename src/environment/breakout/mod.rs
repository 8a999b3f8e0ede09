pub mod algebra_2d;
pub mod app_game_drawer;
pub mod breakout_drawer;
pub mod image_frame_drawer;
pub mod mechanics;
