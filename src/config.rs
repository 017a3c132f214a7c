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

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::enums::Axis;
use crate::error::TurretError;
use crate::utility::{get_config, get_parameter, get_parameter_array, millis};

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct SchedulerConfig {
    // Period of each task in the scheduler.
    pub period: Duration,
    // Priorities of the tasks. The higher value runs first.
    pub priority_camera: u8,
    pub priority_axis: u8,
    pub priority_trigger: u8,
    pub priority_mission: u8,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct AxisConfig {
    pub axis: Axis,
    // Initial position reference of the encoder in degree.
    pub reference: f64,
    // Gains of the PID controller: [kp, ki, kd].
    pub gains: Vec<f64>,
    // Effort limit in percent.
    pub effort_limit: f64,
    // Number of the absolute errors averaged for a settle decision.
    pub window_size: usize,
    // Settle threshold of the averaged absolute error in degree.
    pub settle_threshold: f64,
    // Home setpoint used when returning in degree.
    pub home_setpoint: f64,
    // Ratio of the belt (output / input).
    pub belt_ratio: f64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct TriggerConfig {
    // Servo angles in degree.
    pub neutral_angle: f64,
    pub fire_angle: f64,
    // PWM frequency of the servo in Hz.
    pub servo_frequency: f64,
    // Time to hold the fire position.
    pub fire_dwell: Duration,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct MissionConfig {
    // Wait time before the motors are armed.
    pub start_wait: Duration,
    // Maximum time to wait for both axes to settle.
    pub monitor_timeout: Duration,
    // Maximum time to wait for the trigger to finish.
    pub fire_timeout: Duration,
    // Time spent on returning to the home position.
    pub return_duration: Duration,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CameraConfig {
    // Refresh rate of the thermal camera in Hz.
    pub refresh_rate: f64,
    // Affine transform from the estimator output to the actuator setpoint.
    pub gain_yaw: f64,
    pub offset_yaw: f64,
    pub gain_pitch: f64,
    pub offset_pitch: f64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Config {
    // Configuration filename.
    pub filename: String,
    pub scheduler: SchedulerConfig,
    pub yaw: AxisConfig,
    pub pitch: AxisConfig,
    pub trigger: TriggerConfig,
    pub mission: MissionConfig,
    pub camera: CameraConfig,
}

impl Config {
    /// Create a new config object.
    ///
    /// # Arguments
    /// * `filepath` - The path to the turret parameters file.
    ///
    /// # Returns
    /// A new config object.
    ///
    /// # Errors
    /// If the file can not be read, or a parameter is missing or invalid.
    pub fn new(filepath: &Path) -> Result<Self, TurretError> {
        let config = get_config(filepath)?;

        let scheduler = SchedulerConfig {
            period: millis(get_parameter(&config, "scheduler.period")?),
            priority_camera: get_parameter(&config, "scheduler.priority_camera")?,
            priority_axis: get_parameter(&config, "scheduler.priority_axis")?,
            priority_trigger: get_parameter(&config, "scheduler.priority_trigger")?,
            priority_mission: get_parameter(&config, "scheduler.priority_mission")?,
        };
        if scheduler.period.is_zero() {
            return Err(TurretError::InvalidParameter {
                key: String::from("scheduler.period"),
                reason: String::from("should be larger than 0"),
            });
        }

        let trigger = TriggerConfig {
            neutral_angle: get_parameter(&config, "trigger.neutral_angle")?,
            fire_angle: get_parameter(&config, "trigger.fire_angle")?,
            servo_frequency: get_parameter(&config, "trigger.servo_frequency")?,
            fire_dwell: millis(get_parameter(&config, "trigger.fire_dwell")?),
        };
        let mission = MissionConfig {
            start_wait: millis(get_parameter(&config, "mission.start_wait")?),
            monitor_timeout: millis(get_parameter(&config, "mission.monitor_timeout")?),
            fire_timeout: millis(get_parameter(&config, "mission.fire_timeout")?),
            return_duration: millis(get_parameter(&config, "mission.return_duration")?),
        };

        // The trigger must finish the dwell before the mission gives up on it.
        if mission.fire_timeout <= trigger.fire_dwell {
            return Err(TurretError::InvalidParameter {
                key: String::from("mission.fire_timeout"),
                reason: format!(
                    "should be larger than trigger.fire_dwell ({} ms)",
                    trigger.fire_dwell.as_millis()
                ),
            });
        }

        Ok(Self {
            filename: filepath.display().to_string(),
            scheduler,
            yaw: Self::read_axis(&config, Axis::Yaw)?,
            pitch: Self::read_axis(&config, Axis::Pitch)?,
            trigger,
            mission,
            camera: CameraConfig {
                refresh_rate: get_parameter(&config, "camera.refresh_rate")?,
                gain_yaw: get_parameter(&config, "camera.gain_yaw")?,
                offset_yaw: get_parameter(&config, "camera.offset_yaw")?,
                gain_pitch: get_parameter(&config, "camera.gain_pitch")?,
                offset_pitch: get_parameter(&config, "camera.offset_pitch")?,
            },
        })
    }

    /// Get the axis configuration.
    ///
    /// # Arguments
    /// * `axis` - Axis.
    ///
    /// # Returns
    /// Configuration of the axis.
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::Yaw => &self.yaw,
            Axis::Pitch => &self.pitch,
        }
    }

    /// Read the configuration of an axis. The keys are under the section of
    /// the lowercase axis name.
    ///
    /// # Arguments
    /// * `config` - Configuration.
    /// * `axis` - Axis.
    ///
    /// # Returns
    /// Configuration of the axis.
    fn read_axis(config: &config::Config, axis: Axis) -> Result<AxisConfig, TurretError> {
        let section = axis.as_ref().to_lowercase();
        let key = |name: &str| format!("{section}.{name}");

        let gains: Vec<f64> = get_parameter_array(config, &key("gains"))?;
        if gains.len() != 3 {
            return Err(TurretError::InvalidParameter {
                key: key("gains"),
                reason: String::from("should be [kp, ki, kd]"),
            });
        }

        let window_size: usize = get_parameter(config, &key("window_size"))?;
        if window_size == 0 {
            return Err(TurretError::InvalidParameter {
                key: key("window_size"),
                reason: String::from("should be larger than 0"),
            });
        }

        Ok(AxisConfig {
            axis,
            reference: get_parameter(config, &key("reference"))?,
            gains,
            effort_limit: get_parameter(config, &key("effort_limit"))?,
            window_size,
            settle_threshold: get_parameter(config, &key("settle_threshold"))?,
            home_setpoint: get_parameter(config, &key("home_setpoint"))?,
            belt_ratio: get_parameter(config, &key("belt_ratio"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::io::Write;

    use crate::constants::DEFAULT_CONFIG_FILE;

    fn create_config() -> Config {
        Config::new(Path::new(DEFAULT_CONFIG_FILE)).unwrap()
    }

    #[test]
    fn test_new() {
        let config = create_config();

        assert_eq!(config.filename, DEFAULT_CONFIG_FILE);

        assert_eq!(config.scheduler.period, Duration::from_millis(15));
        assert_eq!(config.scheduler.priority_camera, 1);
        assert_eq!(config.scheduler.priority_axis, 9);
        assert_eq!(config.scheduler.priority_trigger, 10);
        assert_eq!(config.scheduler.priority_mission, 10);

        assert_eq!(config.yaw.axis, Axis::Yaw);
        assert_eq!(config.yaw.reference, -180.0);
        assert_eq!(config.yaw.gains, vec![5.0, 0.022, 1.0]);
        assert_eq!(config.yaw.window_size, 25);
        assert_eq!(config.yaw.settle_threshold, 0.5);

        assert_eq!(config.pitch.reference, -30.0);
        assert_eq!(config.pitch.gains, vec![0.1, 0.0, 0.0]);
        assert_eq!(config.pitch.window_size, 5);
        assert_eq!(config.pitch.settle_threshold, 1.0);
        assert_eq!(config.pitch.belt_ratio, 2.0);

        assert_eq!(config.trigger.fire_angle, 15.0);
        assert_eq!(config.trigger.neutral_angle, 0.0);
        assert_eq!(config.trigger.fire_dwell, Duration::from_millis(450));

        assert_eq!(config.mission.start_wait, Duration::from_millis(500));
        assert!(config.mission.fire_timeout > config.trigger.fire_dwell);
    }

    #[test]
    fn test_axis() {
        let config = create_config();

        assert_eq!(config.axis(Axis::Yaw).axis, Axis::Yaw);
        assert_eq!(config.axis(Axis::Pitch).axis, Axis::Pitch);
    }

    fn create_config_file(from: &str, to: &str) -> tempfile::NamedTempFile {
        let content = fs::read_to_string(DEFAULT_CONFIG_FILE)
            .unwrap()
            .replace(from, to);

        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();

        file
    }

    #[test]
    fn test_new_invalid_window_size() {
        let file = create_config_file("window_size: 5", "window_size: 0");

        match Config::new(file.path()) {
            Err(TurretError::InvalidParameter { key, .. }) => {
                assert_eq!(key, "pitch.window_size")
            }
            _ => panic!("Should fail with the invalid window size."),
        }
    }

    #[test]
    fn test_new_fire_timeout_not_longer_than_dwell() {
        for dwell in ["fire_dwell: 2500", "fire_dwell: 2000"] {
            let file = create_config_file("fire_dwell: 450", dwell);

            match Config::new(file.path()) {
                Err(TurretError::InvalidParameter { key, .. }) => {
                    assert_eq!(key, "mission.fire_timeout")
                }
                _ => panic!("Should fail with the fire timeout within the dwell."),
            }
        }

        let file = create_config_file("fire_dwell: 450", "fire_dwell: 1999");
        assert!(Config::new(file.path()).is_ok());
    }
}
