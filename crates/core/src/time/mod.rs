pub mod game_day;
