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

use std::cell::RefCell;
use std::rc::Rc;

use crate::control::math_tool::servo_angle_to_duty_percent;
use crate::driver::ServoDriver;

#[derive(Clone, Debug, Default)]
pub struct MockServoState {
    // Commanded angles in degree in order.
    pub angles: Vec<f64>,
    // Duty cycle of the PWM in percent.
    pub duty_percent: f64,
    pub is_enabled: bool,
    pub count_disable: u32,
}

/// Servo that records the commanded angles.
#[derive(Clone)]
pub struct MockServo {
    _frequency: f64,
    _state: Rc<RefCell<MockServoState>>,
}

impl MockServo {
    /// Create a new servo.
    ///
    /// # Arguments
    /// * `frequency` - PWM frequency in Hz.
    ///
    /// # Returns
    /// A new servo.
    pub fn new(frequency: f64) -> Self {
        Self {
            _frequency: frequency,
            _state: Rc::new(RefCell::new(MockServoState::default())),
        }
    }

    /// Latest commanded angle in degree.
    pub fn angle(&self) -> Option<f64> {
        self._state.borrow().angles.last().copied()
    }

    /// Snapshot of the internal state.
    pub fn state(&self) -> MockServoState {
        self._state.borrow().clone()
    }
}

impl ServoDriver for MockServo {
    fn set_angle(&mut self, angle: f64) {
        let mut state = self._state.borrow_mut();

        state.angles.push(angle);
        state.duty_percent = servo_angle_to_duty_percent(angle, self._frequency);
        state.is_enabled = true;
    }

    fn disable(&mut self) {
        let mut state = self._state.borrow_mut();

        state.duty_percent = 0.0;
        state.is_enabled = false;
        state.count_disable += 1;
    }
}
