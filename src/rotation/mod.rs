//! Gear rotation
//!
//! - **Cursor**: round-robin position shared by all players in a pass
//! - **Pass**: one walk over the connected players, equipping a gear set each
//! - **Driver**: repeating timer that submits a uniquely named pass per tick

mod cursor;
mod driver;
mod pass;


pub use cursor::RotationCursor;
pub use driver::{DriverState, RotationDriver};
pub use pass::{PassSummary, run_rotation_pass, select_gear_set};
