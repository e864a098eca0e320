//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame pacing (display-refresh callbacks feed a loop driver)
//! - Storage backends live in `persistence`

pub mod clock;

pub use clock::{FrameToken, LoopDriver};
