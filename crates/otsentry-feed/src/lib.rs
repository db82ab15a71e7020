pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod window;

pub use cache::SeenCache;
pub use client::NvdClient;
pub use error::{FeedError, Result};
pub use window::FetchWindow;
