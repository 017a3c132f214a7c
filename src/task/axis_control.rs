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

use log::{debug, info};
use std::time::Instant;

use crate::channel::{ChannelReader, SharedChannel};
use crate::config::AxisConfig;
use crate::control::in_position::InPosition;
use crate::driver::{Controller, MotorDriver, PositionSensor};
use crate::enums::{Axis, AxisState};
use crate::error::TurretError;
use crate::scheduler::task::Task;

/// Channels used by an axis control task.
pub struct AxisChannels {
    pub setpoint: ChannelReader<f64>,
    pub run: ChannelReader<bool>,
    pub done: SharedChannel<bool>,
}

/// Task of the closed-loop position control of an axis.
pub struct AxisControlTask {
    pub axis: Axis,
    _name: String,
    _state: AxisState,
    _reference: f64,
    _motor: Box<dyn MotorDriver>,
    _sensor: Box<dyn PositionSensor>,
    _controller: Box<dyn Controller>,
    _in_position: InPosition,
    _channels: AxisChannels,
    // Latest applied effort in percent.
    pub effort: f64,
    // Latest measured position in degree.
    pub position: f64,
}

impl AxisControlTask {
    /// Create a new axis control task.
    ///
    /// # Arguments
    /// * `config` - Configuration of the axis.
    /// * `motor` - Motor driver.
    /// * `sensor` - Position sensor.
    /// * `controller` - Position controller.
    /// * `channels` - Channels of the axis.
    ///
    /// # Returns
    /// A new task.
    pub fn new(
        config: &AxisConfig,
        motor: Box<dyn MotorDriver>,
        sensor: Box<dyn PositionSensor>,
        controller: Box<dyn Controller>,
        channels: AxisChannels,
    ) -> Self {
        Self {
            axis: config.axis,
            _name: config.axis.as_ref().to_lowercase(),
            _state: AxisState::Init,
            _reference: config.reference,
            _motor: motor,
            _sensor: sensor,
            _controller: controller,
            _in_position: InPosition::new(config.window_size, config.settle_threshold),
            _channels: channels,
            effort: 0.0,
            position: config.reference,
        }
    }

    /// Current state.
    pub fn state(&self) -> AxisState {
        self._state
    }

    /// Number of the samples waiting for the next settle decision.
    pub fn num_error_sample(&self) -> usize {
        self._in_position.num_sample()
    }

    /// Apply the effort to the motor.
    fn apply(&mut self, effort: f64) {
        self._motor.set_output(effort);
        self.effort = effort;
    }

    /// Hold the axis and go back to the idle state.
    fn hold(&mut self) {
        self.apply(0.0);
        self._controller.reset();
        self._in_position.reset();
        self._state = AxisState::Idle;
    }

    /// Track the setpoint for one pass.
    fn track(&mut self) {
        let setpoint = self._channels.setpoint.get();
        self._controller.set_setpoint(setpoint);

        self.position = self._sensor.read();
        let error = setpoint - self.position;

        if let Some(is_settled) = self._in_position.is_in_position(error) {
            debug!(
                "Settle decision of the {} axis: {is_settled} (error: {error:.3} degree).",
                self._name
            );
            if is_settled {
                self._channels.done.put(true);
            }
        }

        let effort = self._controller.run(self.position);
        self.apply(effort);
    }
}

impl Task for AxisControlTask {
    fn name(&self) -> &str {
        &self._name
    }

    fn state_name(&self) -> &str {
        self._state.as_ref()
    }

    fn step(&mut self, _now: Instant) -> Result<(), TurretError> {
        match self._state {
            AxisState::Init => {
                // Disable the output before any other setup.
                self.apply(0.0);

                self._sensor.set_reference(self._reference);
                self._controller.reset();

                self._state = AxisState::Idle;
                info!(
                    "The {} axis is initialized at {} degree.",
                    self._name, self._reference
                );
            }

            AxisState::Idle => {
                self.apply(0.0);

                if self._channels.run.get() {
                    self._state = AxisState::Track;
                    info!("The {} axis starts tracking.", self._name);
                }
            }

            AxisState::Track => {
                if self._channels.run.get() {
                    self.track();
                } else {
                    self.hold();
                    info!("The {} axis is held.", self._name);
                }
            }
        }

        Ok(())
    }

    fn shutdown(&mut self) {
        self.effort = 0.0;
        self._motor.disable();
    }
}
