//! Simulated drivers of the turret.

pub mod mock_axis;
pub mod mock_camera;
pub mod mock_constants;
pub mod mock_servo;
pub mod mock_turret;
