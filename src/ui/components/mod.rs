pub mod achievement_list;
pub mod dashboard;
pub mod fireworks;
pub mod galaxy_map;
pub mod hud;
pub mod matching_grid;
pub mod menu;
pub mod progress_bar;
pub mod quiz_area;
