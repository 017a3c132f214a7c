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

use crate::config::Config;
use crate::mock::{
    mock_axis::{MockAxisPlant, MockEncoder, MockMotor},
    mock_camera::{HotspotEstimator, MockThermalCamera},
    mock_servo::MockServo,
};
use crate::model::{AxisHardware, Hardware};

/// Simulated turret. It keeps the handles of the simulated plants and the
/// servo to inspect them while the tasks own the drivers.
pub struct MockTurret {
    pub plant_yaw: Rc<RefCell<MockAxisPlant>>,
    pub plant_pitch: Rc<RefCell<MockAxisPlant>>,
    pub servo: MockServo,
}

impl MockTurret {
    /// Create a new simulated turret.
    ///
    /// # Arguments
    /// * `config` - Configuration.
    ///
    /// # Returns
    /// The simulated turret and the drivers to hand over to the model.
    pub fn new(config: &Config) -> (Self, Hardware) {
        let plant_yaw = Rc::new(RefCell::new(MockAxisPlant::default()));
        let plant_pitch = Rc::new(RefCell::new(MockAxisPlant::default()));
        let servo = MockServo::new(config.trigger.servo_frequency);

        let hardware = Hardware {
            yaw: AxisHardware {
                motor: Box::new(MockMotor::new(&plant_yaw)),
                sensor: Box::new(MockEncoder::new(&plant_yaw, config.yaw.belt_ratio)),
            },
            pitch: AxisHardware {
                motor: Box::new(MockMotor::new(&plant_pitch)),
                sensor: Box::new(MockEncoder::new(&plant_pitch, config.pitch.belt_ratio)),
            },
            servo: Box::new(servo.clone()),
            camera: Box::new(MockThermalCamera::new(
                config.camera.refresh_rate,
                config.scheduler.period,
            )),
            estimator: Box::new(HotspotEstimator),
        };

        (
            Self {
                plant_yaw,
                plant_pitch,
                servo,
            },
            hardware,
        )
    }

    /// All the actuators are disabled or not.
    pub fn is_disabled(&self) -> bool {
        !self.plant_yaw.borrow().is_enabled
            && !self.plant_pitch.borrow().is_enabled
            && !self.servo.state().is_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use crate::constants::DEFAULT_CONFIG_FILE;

    #[test]
    fn test_new() {
        let config = Config::new(Path::new(DEFAULT_CONFIG_FILE)).unwrap();

        let (turret, mut hardware) = MockTurret::new(&config);

        hardware.yaw.motor.set_output(10.0);
        hardware.servo.set_angle(15.0);

        assert_eq!(turret.plant_yaw.borrow().effort, 10.0);
        assert_eq!(turret.plant_pitch.borrow().effort, 0.0);
        assert_eq!(turret.servo.angle(), Some(15.0));
        assert!(!turret.is_disabled());

        hardware.yaw.motor.disable();
        hardware.servo.disable();

        assert!(turret.is_disabled());
    }
}
