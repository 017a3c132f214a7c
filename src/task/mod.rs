//! Finite-state tasks of the turret. Each task advances by one step per
//! scheduler pass and talks to the others only through the shared channels.

pub mod axis_control;
pub mod camera_acquisition;
pub mod mission_sequencer;
pub mod trigger;
