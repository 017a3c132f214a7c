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

use crate::constants::{
    ENCODER_COUNTS_PER_TICK, ENCODER_TICKS_PER_REVOLUTION, MOTOR_GEARBOX_RATIO,
    SERVO_PULSE_MAX_US, SERVO_PULSE_MIN_US, SERVO_RANGE_DEGREE,
};

/// Clip the value between the lower and upper bounds.
///
/// # Arguments
/// * `value` - The value to be clipped.
/// * `lower` - The lower bound.
/// * `upper` - The upper bound.
///
/// # Returns
/// The clipped value.
pub fn clip<T>(value: T, lower: T, upper: T) -> T
where
    T: PartialOrd,
{
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}

/// Calculate the encoder counts per degree of the output axis.
///
/// # Arguments
/// * `belt_ratio` - Ratio of the belt (output / input).
///
/// # Returns
/// Encoder counts per degree.
pub fn encoder_counts_per_degree(belt_ratio: f64) -> f64 {
    let mechanical_advantage = MOTOR_GEARBOX_RATIO * belt_ratio;

    ENCODER_COUNTS_PER_TICK * ENCODER_TICKS_PER_REVOLUTION / 360.0 * mechanical_advantage
}

/// Convert the servo angle to the duty cycle of PWM.
///
/// # Arguments
/// * `angle` - Servo angle in degree. It is clipped to 0-180 degree.
/// * `frequency` - PWM frequency in Hz.
///
/// # Returns
/// Duty cycle in percent.
pub fn servo_angle_to_duty_percent(angle: f64, frequency: f64) -> f64 {
    let ratio = clip(angle, 0.0, SERVO_RANGE_DEGREE) / SERVO_RANGE_DEGREE;
    let pulse_us = ratio * (SERVO_PULSE_MAX_US - SERVO_PULSE_MIN_US) + SERVO_PULSE_MIN_US;

    pulse_us * 1e-6 * frequency * 100.0
}

/// Affine transform of the value.
///
/// # Arguments
/// * `value` - Input value.
/// * `gain` - Gain.
/// * `offset` - Offset.
///
/// # Returns
/// gain * value + offset.
pub fn affine(value: f64, gain: f64, offset: f64) -> f64 {
    gain * value + offset
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-7;

    #[test]
    fn test_clip() {
        assert_eq!(clip(10.0, -3.0, 5.0), 5.0);
        assert_eq!(clip(-10.0, -3.0, 5.0), -3.0);
        assert_eq!(clip(3.0, -3.0, 5.0), 3.0);
    }

    #[test]
    fn test_encoder_counts_per_degree() {
        assert_relative_eq!(
            encoder_counts_per_degree(1.0),
            45.5111111,
            epsilon = EPSILON
        );
        assert_relative_eq!(
            encoder_counts_per_degree(2.0),
            91.0222222,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_servo_angle_to_duty_percent() {
        // 500 us at 50 Hz
        assert_relative_eq!(servo_angle_to_duty_percent(0.0, 50.0), 2.5, epsilon = EPSILON);
        // 1500 us at 50 Hz
        assert_relative_eq!(servo_angle_to_duty_percent(90.0, 50.0), 7.5, epsilon = EPSILON);
        // 2500 us at 50 Hz
        assert_relative_eq!(
            servo_angle_to_duty_percent(180.0, 50.0),
            12.5,
            epsilon = EPSILON
        );

        // Out of range
        assert_relative_eq!(
            servo_angle_to_duty_percent(-20.0, 50.0),
            2.5,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_affine() {
        assert_eq!(affine(2.0, 1.5, -1.0), 2.0);
        assert_eq!(affine(0.0, 1.0, 0.0), 0.0);
    }
}
