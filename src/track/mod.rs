//! Infinite horizontal marquee: measurement, loop timeline, navigation and
//! the controller that ties them to a ticker.

pub mod controller;
pub mod measure;
pub mod navigator;
pub mod timeline;

pub use controller::{JumpOptions, Marquee};
pub use measure::{ElementMetrics, Snap, TrackSurface};
pub use navigator::{Navigator, Route};
pub use timeline::{LoopTimeline, Motion, Segment, TrackElement};
