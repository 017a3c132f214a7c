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
use crate::config::TriggerConfig;
use crate::driver::ServoDriver;
use crate::enums::TriggerState;
use crate::error::TurretError;
use crate::scheduler::task::Task;
use crate::utility::is_expired;

/// Channels used by the trigger task.
pub struct TriggerChannels {
    pub done_yaw: ChannelReader<bool>,
    pub done_pitch: ChannelReader<bool>,
    // Writer in the fire phase.
    pub run: SharedChannel<bool>,
    pub returning: SharedChannel<bool>,
}

/// Task to fire once when both axes are settled.
pub struct TriggerTask {
    _state: TriggerState,
    _servo: Box<dyn ServoDriver>,
    _config: TriggerConfig,
    _channels: TriggerChannels,
    // Deadline to return the servo to the neutral position.
    _deadline: Option<Instant>,
    // Number of the fired shots.
    pub count_fire: u32,
}

impl TriggerTask {
    /// Create a new trigger task.
    ///
    /// # Arguments
    /// * `config` - Trigger configuration.
    /// * `servo` - Servo of the trigger.
    /// * `channels` - Channels of the trigger.
    ///
    /// # Returns
    /// A new task.
    pub fn new(
        config: &TriggerConfig,
        servo: Box<dyn ServoDriver>,
        channels: TriggerChannels,
    ) -> Self {
        Self {
            _state: TriggerState::Init,
            _servo: servo,
            _config: config.clone(),
            _channels: channels,
            _deadline: None,
            count_fire: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> TriggerState {
        self._state
    }

    /// Both axes are settled or not.
    fn is_on_target(&self) -> bool {
        self._channels.done_yaw.get() && self._channels.done_pitch.get()
    }
}

impl Task for TriggerTask {
    fn name(&self) -> &str {
        "trigger"
    }

    fn state_name(&self) -> &str {
        self._state.as_ref()
    }

    fn step(&mut self, now: Instant) -> Result<(), TurretError> {
        match self._state {
            TriggerState::Init => {
                self._servo.set_angle(self._config.neutral_angle);

                self._state = TriggerState::Armed;
                info!("Trigger is armed.");
            }

            TriggerState::Armed => {
                if self.is_on_target() {
                    self._servo.set_angle(self._config.fire_angle);

                    // Hold both axes while firing.
                    self._channels.run.put(false);

                    self._deadline = Some(now + self._config.fire_dwell);
                    self.count_fire += 1;

                    self._state = TriggerState::Firing;
                    info!("Fire.");
                }
            }

            TriggerState::Firing => {
                if is_expired(now, self._deadline) {
                    self._servo.set_angle(self._config.neutral_angle);

                    self._channels.run.put(true);
                    self._channels.returning.put(true);

                    self._deadline = None;
                    self._state = TriggerState::ResetWait;
                    debug!("Trigger is back to the neutral position.");
                }
            }

            TriggerState::ResetWait => {
                self._state = TriggerState::IdleDone;
                info!("Trigger is done.");
            }

            TriggerState::IdleDone => {}
        }

        Ok(())
    }

    fn shutdown(&mut self) {
        self._servo.set_angle(self._config.neutral_angle);
        self._servo.disable();
    }
}
