pub mod activity;
pub mod dates;
pub mod timeline;

pub use activity::Activity;
pub use timeline::{LoadError, Timeline, parse_timelines};
