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

use crate::constants::MAX_EFFORT_PERCENT;
use crate::control::math_tool::{clip, encoder_counts_per_degree};
use crate::driver::{MotorDriver, PositionSensor};
use crate::mock::mock_constants::PLANT_DEGREE_PER_PERCENT;

/// Simulated axis: the position moves proportionally to the applied effort in
/// each pass.
#[derive(Clone, Debug, Default)]
pub struct MockAxisPlant {
    // Physical position in degree.
    pub position: f64,
    // Applied effort in percent.
    pub effort: f64,
    // Motor power is enabled or not.
    pub is_enabled: bool,
    // Number of the calls to disable the motor.
    pub count_disable: u32,
}

/// Motor of the simulated axis.
#[derive(Clone)]
pub struct MockMotor {
    _plant: Rc<RefCell<MockAxisPlant>>,
}

impl MockMotor {
    /// Create a new motor.
    ///
    /// # Arguments
    /// * `plant` - Simulated axis.
    ///
    /// # Returns
    /// A new motor.
    pub fn new(plant: &Rc<RefCell<MockAxisPlant>>) -> Self {
        Self {
            _plant: plant.clone(),
        }
    }
}

impl MotorDriver for MockMotor {
    fn set_output(&mut self, percent: f64) {
        let mut plant = self._plant.borrow_mut();

        plant.is_enabled = true;
        plant.effort = clip(percent, -MAX_EFFORT_PERCENT, MAX_EFFORT_PERCENT);
        plant.position += plant.effort * PLANT_DEGREE_PER_PERCENT;
    }

    fn disable(&mut self) {
        let mut plant = self._plant.borrow_mut();

        plant.is_enabled = false;
        plant.effort = 0.0;
        plant.count_disable += 1;
    }
}

/// Quadrature encoder of the simulated axis. The reading is quantized to the
/// encoder counts.
#[derive(Clone)]
pub struct MockEncoder {
    _plant: Rc<RefCell<MockAxisPlant>>,
    _counts_per_degree: f64,
    // Physical position at the reference.
    _zero: f64,
    // Reference position in degree.
    _reference: f64,
}

impl MockEncoder {
    /// Create a new encoder.
    ///
    /// # Arguments
    /// * `plant` - Simulated axis.
    /// * `belt_ratio` - Ratio of the belt (output / input).
    ///
    /// # Returns
    /// A new encoder.
    pub fn new(plant: &Rc<RefCell<MockAxisPlant>>, belt_ratio: f64) -> Self {
        Self {
            _plant: plant.clone(),
            _counts_per_degree: encoder_counts_per_degree(belt_ratio),
            _zero: 0.0,
            _reference: 0.0,
        }
    }
}

impl PositionSensor for MockEncoder {
    fn read(&mut self) -> f64 {
        let counts =
            ((self._plant.borrow().position - self._zero) * self._counts_per_degree).round();

        counts / self._counts_per_degree + self._reference
    }

    fn set_reference(&mut self, degree: f64) {
        self._zero = self._plant.borrow().position;
        self._reference = degree;
    }
}
