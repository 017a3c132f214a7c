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

use std::time::Duration;

use crate::camera::frame::Frame;
use crate::constants::{
    CAMERA_FOV_HORIZONTAL, CAMERA_FOV_VERTICAL, NUM_FRAME_COLUMN, NUM_FRAME_PIXEL, NUM_FRAME_ROW,
    NUM_SUBPAGE,
};
use crate::driver::{ImagingSensor, TargetEstimator};
use crate::error::TurretError;
use crate::mock::mock_constants::{
    PLANT_BACKGROUND_LEVEL, PLANT_TARGET_COLUMN, PLANT_TARGET_LEVEL, PLANT_TARGET_ROW,
};

/// Thermal camera that delivers the frame in two subpages. A subpage becomes
/// readable after a number of polls that follows the refresh rate.
pub struct MockThermalCamera {
    // Camera is on the bus or not.
    pub is_connected: bool,
    pub is_configured: bool,
    // Location of the hot target in the buffer of the sensor.
    pub target: (usize, usize),
    // Number of the complete frames delivered.
    pub count_frame: u64,
    _refresh_rate: f64,
    _poll_period: Duration,
    _polls_per_subpage: u32,
    _count_poll: u32,
    _is_getting_image: bool,
    _subpage: usize,
}

impl MockThermalCamera {
    /// Create a new thermal camera.
    ///
    /// # Arguments
    /// * `refresh_rate` - Refresh rate of the full frame in Hz.
    /// * `poll_period` - Period of the polling.
    ///
    /// # Returns
    /// A new thermal camera.
    pub fn new(refresh_rate: f64, poll_period: Duration) -> Self {
        Self {
            is_connected: true,
            is_configured: false,
            target: (PLANT_TARGET_ROW, PLANT_TARGET_COLUMN),
            count_frame: 0,
            _refresh_rate: refresh_rate,
            _poll_period: poll_period,
            _polls_per_subpage: 1,
            _count_poll: 0,
            _is_getting_image: false,
            _subpage: 0,
        }
    }

    /// The data of the current subpage is ready or not.
    fn has_data(&mut self) -> bool {
        self._count_poll += 1;
        if self._count_poll >= self._polls_per_subpage {
            self._count_poll = 0;
            return true;
        }

        false
    }

    /// Create the raw buffer of the scene with the hot target.
    fn read_raw(&self) -> Vec<f64> {
        let mut raw = vec![PLANT_BACKGROUND_LEVEL; NUM_FRAME_PIXEL];
        let (row, col) = self.target;
        if (row < NUM_FRAME_ROW) && (col < NUM_FRAME_COLUMN) {
            raw[row * NUM_FRAME_COLUMN + col] = PLANT_TARGET_LEVEL;
        }

        raw
    }
}

impl ImagingSensor for MockThermalCamera {
    fn configure(&mut self) -> Result<(), TurretError> {
        if !self.is_connected {
            return Err(TurretError::SensorConfiguration(String::from(
                "no thermal camera on the bus",
            )));
        }

        // Each subpage takes half of the frame time.
        let subpage_time = 1.0 / (self._refresh_rate * (NUM_SUBPAGE as f64));
        let polls = (subpage_time / self._poll_period.as_secs_f64()).ceil();
        self._polls_per_subpage = if polls >= 1.0 { polls as u32 } else { 1 };

        self.is_configured = true;

        Ok(())
    }

    fn poll_frame(&mut self) -> Option<Frame> {
        if !self._is_getting_image {
            self._subpage = 0;
            self._is_getting_image = true;
        }

        if !self.has_data() {
            return None;
        }

        if self._subpage == 0 {
            self._subpage = 1;
            return None;
        }

        self._is_getting_image = false;
        self.count_frame += 1;

        Frame::from_raw(&self.read_raw())
    }
}

/// Estimator that points to the hottest pixel of the frame.
pub struct HotspotEstimator;

impl TargetEstimator for HotspotEstimator {
    fn estimate(&mut self, frame: &Frame) -> (f64, f64) {
        let (row, col, _) = frame.hottest_pixel();

        let yaw = ((col as f64) + 0.5 - (NUM_FRAME_COLUMN as f64) / 2.0)
            / (NUM_FRAME_COLUMN as f64)
            * CAMERA_FOV_HORIZONTAL;
        let pitch = ((NUM_FRAME_ROW as f64) / 2.0 - (row as f64) - 0.5)
            / (NUM_FRAME_ROW as f64)
            * CAMERA_FOV_VERTICAL;

        (yaw, pitch)
    }
}
