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

use crate::control::math_tool::clip;
use crate::driver::Controller;

/// Discrete proportional-integral-derivative (PID) controller on the
/// position error. The controller is run once per scheduler pass, so the
/// integral and derivative terms are per pass.
pub struct PidController {
    // Gains.
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    // Effort limit in percent. The output is within [-limit, limit].
    pub effort_limit: f64,
    _setpoint: f64,
    _integral: f64,
    _last_error: Option<f64>,
}

impl PidController {
    /// Create a new PID controller.
    ///
    /// # Arguments
    /// * `kp` - Proportional gain.
    /// * `ki` - Integral gain.
    /// * `kd` - Derivative gain.
    /// * `effort_limit` - Effort limit in percent.
    ///
    /// # Returns
    /// A new PID controller.
    pub fn new(kp: f64, ki: f64, kd: f64, effort_limit: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            effort_limit: effort_limit.abs(),
            _setpoint: 0.0,
            _integral: 0.0,
            _last_error: None,
        }
    }

    /// Current setpoint in degree.
    pub fn setpoint(&self) -> f64 {
        self._setpoint
    }
}

impl Controller for PidController {
    fn set_setpoint(&mut self, degree: f64) {
        self._setpoint = degree;
    }

    fn run(&mut self, measured: f64) -> f64 {
        let error = self._setpoint - measured;

        // Limit the integral so the integral term alone can not exceed the
        // effort limit.
        self._integral += error;
        if self.ki != 0.0 {
            let bound = self.effort_limit / self.ki.abs();
            self._integral = clip(self._integral, -bound, bound);
        }

        let derivative = self._last_error.map_or(0.0, |last| error - last);
        self._last_error = Some(error);

        let effort = self.kp * error + self.ki * self._integral + self.kd * derivative;

        clip(effort, -self.effort_limit, self.effort_limit)
    }

    fn reset(&mut self) {
        self._integral = 0.0;
        self._last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-7;

    #[test]
    fn test_run_proportional() {
        let mut controller = PidController::new(2.0, 0.0, 0.0, 100.0);
        controller.set_setpoint(10.0);

        assert_relative_eq!(controller.run(4.0), 12.0, epsilon = EPSILON);
        assert_eq!(controller.setpoint(), 10.0);
    }

    #[test]
    fn test_run_clipped() {
        let mut controller = PidController::new(5.0, 0.0, 0.0, 100.0);

        controller.set_setpoint(180.0);
        assert_eq!(controller.run(0.0), 100.0);

        controller.set_setpoint(-180.0);
        assert_eq!(controller.run(0.0), -100.0);
    }

    #[test]
    fn test_run_integral_and_derivative() {
        let mut controller = PidController::new(0.0, 0.5, 1.0, 100.0);
        controller.set_setpoint(2.0);

        // Integral: 2, derivative: 0
        assert_relative_eq!(controller.run(0.0), 1.0, epsilon = EPSILON);
        // Integral: 3, derivative: -1
        assert_relative_eq!(controller.run(1.0), 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_integral_bound() {
        let mut controller = PidController::new(0.0, 1.0, 0.0, 10.0);
        controller.set_setpoint(100.0);

        for _ in 0..10 {
            controller.run(0.0);
        }

        assert_eq!(controller._integral, 10.0);
    }

    #[test]
    fn test_reset() {
        let mut controller = PidController::new(1.0, 1.0, 1.0, 100.0);
        controller.set_setpoint(5.0);
        controller.run(0.0);

        controller.reset();

        assert_eq!(controller._integral, 0.0);
        assert!(controller._last_error.is_none());
    }
}
