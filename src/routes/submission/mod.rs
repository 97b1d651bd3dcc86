mod handler;
pub mod model;

pub use handler::{create_submission, get_submission, list_submissions};
