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

pub const NUM_AXIS: usize = 2;

// Thermal camera (MLX90640) image size.
pub const NUM_FRAME_ROW: usize = 24;
pub const NUM_FRAME_COLUMN: usize = 32;
pub const NUM_FRAME_PIXEL: usize = NUM_FRAME_ROW * NUM_FRAME_COLUMN;

// The full frame is delivered as two interleaved subpages.
pub const NUM_SUBPAGE: usize = 2;

// Field of view of the thermal camera in degree.
pub const CAMERA_FOV_HORIZONTAL: f64 = 55.0;
pub const CAMERA_FOV_VERTICAL: f64 = 35.0;

// Quadrature encoder on the Pittman motor.
pub const ENCODER_TICKS_PER_REVOLUTION: f64 = 256.0;
pub const ENCODER_COUNTS_PER_TICK: f64 = 4.0;
pub const MOTOR_GEARBOX_RATIO: f64 = 16.0;

// Servo pulse width range in microsecond for 0 to 180 degree.
pub const SERVO_PULSE_MIN_US: f64 = 500.0;
pub const SERVO_PULSE_MAX_US: f64 = 2500.0;
pub const SERVO_RANGE_DEGREE: f64 = 180.0;

// Motor effort is in percent of the full duty cycle.
pub const MAX_EFFORT_PERCENT: f64 = 100.0;

pub const DEFAULT_CONFIG_FILE: &str = "config/parameters_turret.yaml";
pub const DEFAULT_LOG_FILE: &str = "turret.log";
