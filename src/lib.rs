pub mod client;
pub mod game_logic;
pub mod server;
