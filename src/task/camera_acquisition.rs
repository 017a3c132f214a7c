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

use log::{debug, info, trace};
use std::time::Instant;

use crate::camera::frame::Frame;
use crate::channel::{ChannelReader, SharedChannel};
use crate::config::CameraConfig;
use crate::control::math_tool::affine;
use crate::driver::{ImagingSensor, TargetEstimator};
use crate::enums::CameraState;
use crate::error::TurretError;
use crate::scheduler::task::Task;

/// Task to acquire the thermal image and publish the target setpoints.
pub struct CameraAcquisitionTask {
    _state: CameraState,
    _sensor: Box<dyn ImagingSensor>,
    _estimator: Box<dyn TargetEstimator>,
    _transform: CameraConfig,
    _frame: Option<Frame>,
    // Writer of the setpoints except in the return phase.
    _setpoint_yaw: SharedChannel<f64>,
    _setpoint_pitch: SharedChannel<f64>,
    _returning: ChannelReader<bool>,
    // Number of the polls without a complete frame since the last frame.
    pub count_no_frame: u64,
    // Number of the published setpoints.
    pub count_publish: u64,
}

impl CameraAcquisitionTask {
    /// Create a new camera acquisition task.
    ///
    /// # Arguments
    /// * `config` - Camera configuration with the setpoint transform.
    /// * `sensor` - Thermal imaging sensor.
    /// * `estimator` - Target estimator.
    /// * `setpoint_yaw` - Setpoint channel of the yaw axis.
    /// * `setpoint_pitch` - Setpoint channel of the pitch axis.
    /// * `returning` - Returning flag. The setpoints are not published when
    /// it is true.
    ///
    /// # Returns
    /// A new task.
    pub fn new(
        config: &CameraConfig,
        sensor: Box<dyn ImagingSensor>,
        estimator: Box<dyn TargetEstimator>,
        setpoint_yaw: &SharedChannel<f64>,
        setpoint_pitch: &SharedChannel<f64>,
        returning: ChannelReader<bool>,
    ) -> Self {
        Self {
            _state: CameraState::Init,
            _sensor: sensor,
            _estimator: estimator,
            _transform: config.clone(),
            _frame: None,
            _setpoint_yaw: setpoint_yaw.clone(),
            _setpoint_pitch: setpoint_pitch.clone(),
            _returning: returning,
            count_no_frame: 0,
            count_publish: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> CameraState {
        self._state
    }

    /// Publish the setpoints from the estimated target angles.
    fn publish_setpoints(&mut self, yaw: f64, pitch: f64) {
        let setpoint_yaw = affine(yaw, self._transform.gain_yaw, self._transform.offset_yaw);
        let setpoint_pitch = affine(
            pitch,
            self._transform.gain_pitch,
            self._transform.offset_pitch,
        );

        self._setpoint_yaw.put(setpoint_yaw);
        self._setpoint_pitch.put(setpoint_pitch);
        self.count_publish += 1;

        debug!("Target setpoints: yaw {setpoint_yaw:.2}, pitch {setpoint_pitch:.2} degree.");
    }
}

impl Task for CameraAcquisitionTask {
    fn name(&self) -> &str {
        "camera"
    }

    fn state_name(&self) -> &str {
        self._state.as_ref()
    }

    fn step(&mut self, _now: Instant) -> Result<(), TurretError> {
        match self._state {
            CameraState::Init => {
                self._sensor
                    .configure()
                    .map_err(|error| TurretError::TaskFailed {
                        task: self.name().to_string(),
                        reason: error.to_string(),
                    })?;

                self._state = CameraState::AcquireImage;
                info!("Thermal camera is configured.");
            }

            CameraState::AcquireImage => match self._sensor.poll_frame() {
                Some(frame) => {
                    trace!("Frame is acquired after {} polls.", self.count_no_frame);

                    self._frame = Some(frame);
                    self.count_no_frame = 0;
                    self._state = CameraState::EstimateTarget;
                }
                None => {
                    self.count_no_frame += 1;
                }
            },

            CameraState::EstimateTarget => {
                if let Some(frame) = self._frame.take() {
                    let (yaw, pitch) = self._estimator.estimate(&frame);
                    if !self._returning.get() {
                        self.publish_setpoints(yaw, pitch);
                    }
                }

                self._state = CameraState::AcquireImage;
            }
        }

        Ok(())
    }
}
