//! SnapCanvas Application
//!
//! Headless driver that replays gesture and toolbar actions against a
//! canvas and logs the resulting geometry and guides.

mod action;
mod session;

pub use action::{ACTION_HELP, ActionError, SessionAction, print_help};
pub use session::{Session, SessionError};

/// Session replayed when no script is given.
pub const DEMO_SCRIPT: &str = "
# Three photos on a 1000x300 canvas with a quarter grid.
image Pexels-1 1600 900 120 140
image Pexels-2 800 800 500 80
add 820 200 120 80

# Drag the first photo until its center lands on the first grid line.
begin 0
pan 0 60 0
pan 0 68 0
end 0

# Pinch the square photo; its edges snap to the grid.
begin 1
pinch 1 1.4
pinch 1 1.05
end 1

# Butt the rectangle against the right edge of the square photo.
move 2 636 200
end 2

undo
redo
";
