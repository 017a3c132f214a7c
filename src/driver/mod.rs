// This file is part of turret_controller.
//
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Contracts of the hardware collaborators used by the tasks.
//!
//! The PWM generation, H-bridge control, quadrature counting and the I2C
//! transactions of the sensors live behind these traits.

use crate::camera::frame::Frame;
use crate::error::TurretError;

/// Motor driver of an axis.
pub trait MotorDriver {
    /// Set the output effort.
    ///
    /// # Arguments
    /// * `percent` - Effort in percent (-100 to 100).
    fn set_output(&mut self, percent: f64);

    /// Cut the power of the motor. Calling it again has no further effect.
    fn disable(&mut self);
}

/// Position sensor of an axis (e.g. quadrature encoder).
pub trait PositionSensor {
    /// Read the position in degree.
    fn read(&mut self) -> f64;

    /// Set the current position as the reference in degree.
    fn set_reference(&mut self, degree: f64);
}

/// Servo of the trigger.
pub trait ServoDriver {
    /// Command the servo angle in degree (0 to 180).
    fn set_angle(&mut self, angle: f64);

    /// Stop the PWM output. Calling it again has no further effect.
    fn disable(&mut self);
}

/// Nonblocking thermal imaging sensor.
pub trait ImagingSensor {
    /// One-time configuration of the sensor.
    ///
    /// # Errors
    /// If the sensor can not be configured.
    fn configure(&mut self) -> Result<(), TurretError>;

    /// Poll the sensor. The frame is delivered in two subpages, so the
    /// complete frame is only available after the second subpage is read.
    ///
    /// # Returns
    /// The complete frame, or None if it is not ready yet.
    fn poll_frame(&mut self) -> Option<Frame>;
}

/// Estimator of the target angles from the thermal image.
pub trait TargetEstimator {
    /// Estimate the target angles.
    ///
    /// # Returns
    /// Yaw and pitch angles in the estimator's unit.
    fn estimate(&mut self, frame: &Frame) -> (f64, f64);
}

/// Closed-loop position controller.
pub trait Controller {
    /// Set the setpoint in degree.
    fn set_setpoint(&mut self, degree: f64);

    /// Run the controller once.
    ///
    /// # Arguments
    /// * `measured` - Measured position in degree.
    ///
    /// # Returns
    /// Bounded control effort in percent.
    fn run(&mut self, measured: f64) -> f64;

    /// Clear the internal memory (integral and last error).
    fn reset(&mut self);
}
