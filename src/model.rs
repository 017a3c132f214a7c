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

use log::info;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use crate::channel::SharedChannel;
use crate::config::Config;
use crate::control::closed_loop::PidController;
use crate::driver::{ImagingSensor, MotorDriver, PositionSensor, ServoDriver, TargetEstimator};
use crate::enums::Axis;
use crate::error::TurretError;
use crate::scheduler::{Scheduler, TaskProfile};
use crate::task::{
    axis_control::{AxisChannels, AxisControlTask},
    camera_acquisition::CameraAcquisitionTask,
    mission_sequencer::{MissionChannels, MissionSequencerTask},
    trigger::{TriggerChannels, TriggerTask},
};

/// Drivers of an axis.
pub struct AxisHardware {
    pub motor: Box<dyn MotorDriver>,
    pub sensor: Box<dyn PositionSensor>,
}

/// Drivers of the turret. The ownership moves to the tasks.
pub struct Hardware {
    pub yaw: AxisHardware,
    pub pitch: AxisHardware,
    pub servo: Box<dyn ServoDriver>,
    pub camera: Box<dyn ImagingSensor>,
    pub estimator: Box<dyn TargetEstimator>,
}

/// Shared channels between the tasks.
///
/// Writers of each channel:
/// * setpoints - camera task, except the mission sequencer in the return
/// phase (the camera task is suppressed by the returning flag).
/// * done flags - axis tasks. The mission sequencer clears them when the
/// monitor begins and forces them at the end of monitor.
/// * run gate - mission sequencer in the engage phase, trigger task in the
/// fire phase. If the trigger never finishes, the mission sequencer sets it
/// at the fire timeout, which is always after the end of the fire dwell.
/// * returning flag - trigger task at the end of firing, or the mission
/// sequencer at the fire timeout. The mission sequencer clears it at the end
/// of mission.
pub struct Shares {
    pub setpoint_yaw: SharedChannel<f64>,
    pub setpoint_pitch: SharedChannel<f64>,
    pub done_yaw: SharedChannel<bool>,
    pub done_pitch: SharedChannel<bool>,
    pub run: SharedChannel<bool>,
    pub returning: SharedChannel<bool>,
}

impl Shares {
    /// Create the channels. All the flags are false and the setpoints are 0
    /// until written.
    ///
    /// # Returns
    /// New channels.
    pub fn new() -> Self {
        Self {
            setpoint_yaw: SharedChannel::new("yaw_setpoint", 0.0),
            setpoint_pitch: SharedChannel::new("pitch_setpoint", 0.0),
            done_yaw: SharedChannel::new("yaw_done", false),
            done_pitch: SharedChannel::new("pitch_done", false),
            run: SharedChannel::new("run", false),
            returning: SharedChannel::new("returning", false),
        }
    }

    /// Setpoint channel of the axis.
    pub fn setpoint(&self, axis: Axis) -> &SharedChannel<f64> {
        match axis {
            Axis::Yaw => &self.setpoint_yaw,
            Axis::Pitch => &self.setpoint_pitch,
        }
    }

    /// Done flag of the axis.
    pub fn done(&self, axis: Axis) -> &SharedChannel<bool> {
        match axis {
            Axis::Yaw => &self.done_yaw,
            Axis::Pitch => &self.done_pitch,
        }
    }

    /// Snapshot of all the channels.
    pub fn snapshot(&self) -> Value {
        json!([
            self.setpoint_yaw.snapshot(),
            self.setpoint_pitch.snapshot(),
            self.done_yaw.snapshot(),
            self.done_pitch.snapshot(),
            self.run.snapshot(),
            self.returning.snapshot(),
        ])
    }
}

impl Default for Shares {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Model {
    pub scheduler: Scheduler,
    pub shares: Shares,
    // An Arc instance that holds the AtomicBool instance to stop the
    // scheduler.
    pub stop: Arc<AtomicBool>,
}

impl Model {
    /// Create a new model and register all the tasks.
    ///
    /// # Arguments
    /// * `config` - Configuration.
    /// * `hardware` - Drivers of the turret.
    ///
    /// # Returns
    /// A new model.
    pub fn new(config: &Config, hardware: Hardware) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let shares = Shares::new();

        let mut scheduler = Scheduler::new(&stop);
        let period = config.scheduler.period;

        // The sequencer is registered before the trigger. With the same
        // priority, the trigger sees the forced done flags in the same pass.
        scheduler.register(
            Box::new(MissionSequencerTask::new(
                &config.mission,
                (config.yaw.home_setpoint, config.pitch.home_setpoint),
                MissionChannels {
                    setpoint_yaw: shares.setpoint_yaw.clone(),
                    setpoint_pitch: shares.setpoint_pitch.clone(),
                    done_yaw: shares.done_yaw.clone(),
                    done_pitch: shares.done_pitch.clone(),
                    run: shares.run.clone(),
                    returning: shares.returning.clone(),
                },
                &stop,
            )),
            config.scheduler.priority_mission,
            period,
        );

        scheduler.register(
            Box::new(TriggerTask::new(
                &config.trigger,
                hardware.servo,
                TriggerChannels {
                    done_yaw: shares.done_yaw.reader(),
                    done_pitch: shares.done_pitch.reader(),
                    run: shares.run.clone(),
                    returning: shares.returning.clone(),
                },
            )),
            config.scheduler.priority_trigger,
            period,
        );

        for (axis, axis_hardware) in [(Axis::Yaw, hardware.yaw), (Axis::Pitch, hardware.pitch)] {
            let axis_config = config.axis(axis);
            let controller = PidController::new(
                axis_config.gains[0],
                axis_config.gains[1],
                axis_config.gains[2],
                axis_config.effort_limit,
            );

            scheduler.register(
                Box::new(AxisControlTask::new(
                    axis_config,
                    axis_hardware.motor,
                    axis_hardware.sensor,
                    Box::new(controller),
                    AxisChannels {
                        setpoint: shares.setpoint(axis).reader(),
                        run: shares.run.reader(),
                        done: shares.done(axis).clone(),
                    },
                )),
                config.scheduler.priority_axis,
                period,
            );
        }

        scheduler.register(
            Box::new(CameraAcquisitionTask::new(
                &config.camera,
                hardware.camera,
                hardware.estimator,
                &shares.setpoint_yaw,
                &shares.setpoint_pitch,
                shares.returning.reader(),
            )),
            config.scheduler.priority_camera,
            period,
        );

        info!(
            "{} tasks are registered with the period of {} ms.",
            scheduler.number_of_tasks(),
            period.as_millis()
        );

        Self {
            scheduler,
            shares,
            stop,
        }
    }

    /// Run one scheduler pass.
    ///
    /// # Arguments
    /// * `now` - Time of this pass.
    ///
    /// # Returns
    /// Number of the tasks that executed a step.
    ///
    /// # Errors
    /// If a task fails.
    pub fn step(&mut self, now: Instant) -> Result<usize, TurretError> {
        self.scheduler.run_pass(now)
    }

    /// Run the scheduler until the mission ends or the stop is requested.
    ///
    /// # Arguments
    /// * `limit` - Maximum running time. None means no limit.
    ///
    /// # Errors
    /// If a task fails.
    pub fn run(&mut self, limit: Option<Duration>) -> Result<(), TurretError> {
        self.scheduler.run(limit)
    }

    /// The stop is requested or not.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Command all the actuators to the safe state.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }

    /// Profiles of the tasks.
    pub fn profiles(&self) -> Vec<TaskProfile> {
        self.scheduler.profiles()
    }

    /// Report of the task profiles and the channels.
    pub fn report(&self) -> Value {
        json!({
            "count_pass": self.scheduler.count_pass(),
            "tasks": self.profiles(),
            "channels": self.shares.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use crate::constants::DEFAULT_CONFIG_FILE;
    use crate::mock::{mock_camera::MockThermalCamera, mock_turret::MockTurret};

    const MAX_PASS: u32 = 2000;

    fn create_config() -> Config {
        Config::new(Path::new(DEFAULT_CONFIG_FILE)).unwrap()
    }

    fn create_model() -> (Model, MockTurret, Config) {
        let config = create_config();
        let (turret, hardware) = MockTurret::new(&config);

        (Model::new(&config, hardware), turret, config)
    }

    #[test]
    fn test_new() {
        let (model, _, _) = create_model();

        let names: Vec<String> = model
            .profiles()
            .iter()
            .map(|profile| profile.name.clone())
            .collect();
        assert_eq!(names, vec!["mission", "trigger", "yaw", "pitch", "camera"]);

        assert!(!model.is_stopped());
        assert!(!model.shares.run.get());
        assert_eq!(model.shares.setpoint_yaw.get(), 0.0);
    }

    #[test]
    fn test_mission() {
        let (mut model, turret, config) = create_model();
        let home = (config.yaw.home_setpoint, config.pitch.home_setpoint);

        let begin = Instant::now();
        let mut count_home = 0;
        let mut count_armed_firing = 0;
        let mut count_pass = 0;
        while !model.is_stopped() && count_pass < MAX_PASS {
            model
                .step(begin + config.scheduler.period * count_pass)
                .unwrap();
            count_pass += 1;

            let setpoints = (
                model.shares.setpoint_yaw.get(),
                model.shares.setpoint_pitch.get(),
            );
            if model.shares.returning.get() && (setpoints == home) {
                count_home += 1;
            }

            if (turret.servo.angle() == Some(config.trigger.fire_angle))
                && model.shares.run.get()
            {
                count_armed_firing += 1;
            }
        }

        // Mission ends by itself.
        assert!(model.is_stopped());
        assert!(count_pass < MAX_PASS);

        // Fire once and back to the neutral position.
        let angles = turret.servo.state().angles;
        assert_eq!(
            angles,
            vec![
                config.trigger.neutral_angle,
                config.trigger.fire_angle,
                config.trigger.neutral_angle
            ]
        );

        // Camera is suppressed while returning.
        assert!(count_home > 100);

        // Axes are held while firing.
        assert_eq!(count_armed_firing, 0);

        // Returning flag is written by the trigger and cleared at the end.
        assert_eq!(model.shares.returning.count_write(), 2);

        let report = model.report();
        assert_eq!(report["tasks"][0]["state"], "Done");
        assert_eq!(report["tasks"][1]["state"], "IdleDone");
        assert_eq!(report["channels"].as_array().unwrap().len(), 6);

        model.shutdown();

        assert!(turret.is_disabled());
    }

    #[test]
    fn test_step_camera_fails() {
        let config = create_config();
        let (turret, mut hardware) = MockTurret::new(&config);

        let mut camera =
            MockThermalCamera::new(config.camera.refresh_rate, config.scheduler.period);
        camera.is_connected = false;
        hardware.camera = Box::new(camera);

        let mut model = Model::new(&config, hardware);

        assert!(matches!(
            model.step(Instant::now()),
            Err(TurretError::TaskFailed { .. })
        ));
        assert!(model.is_stopped());

        // Shutdown is still done.
        model.shutdown();

        assert!(turret.is_disabled());
        assert_eq!(turret.servo.state().count_disable, 1);
    }
}
