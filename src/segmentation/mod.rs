pub mod grouping;
pub mod sessions;

pub use grouping::{group_sessions, SessionGroup};
pub use sessions::{split_into_sessions, Session};
