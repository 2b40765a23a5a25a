mod body;
mod orrery;
pub mod presets;

pub use body::{Body, BodyID, BodyInfo, BodyKind, CircularOrbit};
pub use orrery::{wrap_phase, Orrery, OrreryError};
