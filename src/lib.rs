//! Cache-first, offline-aware data layer for a feed of posts with their
//! authors and comments.

pub mod cache;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod feed;
pub mod posts;

pub use error::{Error, Result};
pub use feed::{FeedSnapshot, FeedState, PostFeed};
