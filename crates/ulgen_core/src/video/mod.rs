//! Aquisição e exibição de vídeo.

pub mod capture;
pub mod display_loop;
pub mod frame;
pub mod pattern;

pub use capture::{CameraBackend, CameraSource, CaptureError, CaptureHandle};
pub use display_loop::{DisplayState, FrameDisplayLoop, TickOutcome};
pub use frame::{AspectRatio, DisplayImage, DisplayRegion, Frame};
