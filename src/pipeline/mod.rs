//! Pipeline entry points for tracker operations.
//!
//! - `run_tracker`: Fetch the tracker, publish new posts, persist the watermark
//! - `publish_new_posts`: The publishing pass over already scraped cards

pub mod publish;
pub mod run;

pub use publish::publish_new_posts;
pub use run::{RunOptions, run_tracker};
