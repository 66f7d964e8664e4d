//! Background Tasks Module
//!
//! Contains work the HTTP front hands off instead of awaiting inline.
//!
//! # Tasks
//! - Preload: warms the cache for a batch of URLs after the request returns

mod preload;

pub use preload::spawn_preload_task;
