mod handler;
pub mod model;

pub use handler::{create_user, leaderboard, list_users, login};
