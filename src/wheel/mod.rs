pub mod geometry;
pub mod rotation;
pub mod spinner;

pub use geometry::{Wedge, WheelLayout, wedges};
pub use rotation::{final_rotation, normalize_angle, pointer_index, segment_angle, target_angle};
pub use spinner::{SpinPhase, Spinner, Transition, WheelFrame};
