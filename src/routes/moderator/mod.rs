mod handler;
pub mod model;

pub use handler::{approve_submission, list_approvals, pending_submissions, resolve_submission};
