/// Session management module - Gateway

mod state;
mod turn;

pub use state::Session;
pub use turn::{ChatTurn, TurnRole};
