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

use log::{info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Instant;

use crate::channel::SharedChannel;
use crate::config::MissionConfig;
use crate::enums::MissionPhase;
use crate::error::TurretError;
use crate::scheduler::task::Task;
use crate::utility::is_expired;

/// Channels written by the mission sequencer at the phase boundaries.
pub struct MissionChannels {
    pub setpoint_yaw: SharedChannel<f64>,
    pub setpoint_pitch: SharedChannel<f64>,
    pub done_yaw: SharedChannel<bool>,
    pub done_pitch: SharedChannel<bool>,
    pub run: SharedChannel<bool>,
    pub returning: SharedChannel<bool>,
}

/// Top-level phase automaton of the mission.
pub struct MissionSequencerTask {
    _phase: MissionPhase,
    _config: MissionConfig,
    // Home setpoints of the yaw and pitch axes in degree.
    _home: (f64, f64),
    _channels: MissionChannels,
    _deadline: Option<Instant>,
    // Flag to stop the scheduler at the end of mission.
    _stop: Arc<AtomicBool>,
    // Settle of the axes was forced by the timeout or not.
    pub is_timeout: bool,
}

impl MissionSequencerTask {
    /// Create a new mission sequencer.
    ///
    /// # Arguments
    /// * `config` - Mission configuration.
    /// * `home` - Home setpoints of the yaw and pitch axes in degree.
    /// * `channels` - Channels of the mission.
    /// * `stop` - Flag to stop the scheduler.
    ///
    /// # Returns
    /// A new task.
    pub fn new(
        config: &MissionConfig,
        home: (f64, f64),
        channels: MissionChannels,
        stop: &Arc<AtomicBool>,
    ) -> Self {
        Self {
            _phase: MissionPhase::WaitStart,
            _config: config.clone(),
            _home: home,
            _channels: channels,
            _deadline: None,
            _stop: stop.clone(),
            is_timeout: false,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> MissionPhase {
        self._phase
    }

    /// Transit to the next phase.
    fn transit(&mut self, phase: MissionPhase) {
        info!(
            "Mission phase: {} -> {}.",
            self._phase.as_ref(),
            phase.as_ref()
        );
        self._phase = phase;
    }

    /// Both axes are settled or not.
    fn is_settled(&self) -> bool {
        self._channels.done_yaw.get() && self._channels.done_pitch.get()
    }
}

impl Task for MissionSequencerTask {
    fn name(&self) -> &str {
        "mission"
    }

    fn state_name(&self) -> &str {
        self._phase.as_ref()
    }

    fn step(&mut self, now: Instant) -> Result<(), TurretError> {
        match self._phase {
            MissionPhase::WaitStart => {
                self._deadline = Some(now + self._config.start_wait);
                self.transit(MissionPhase::Engage);
            }

            MissionPhase::Engage => {
                if is_expired(now, self._deadline) {
                    self._channels.done_yaw.put(false);
                    self._channels.done_pitch.put(false);
                    self._channels.run.put(true);

                    self._deadline = Some(now + self._config.monitor_timeout);
                    self.transit(MissionPhase::Monitor);
                }
            }

            MissionPhase::Monitor => {
                let is_settled = self.is_settled();
                if is_settled || is_expired(now, self._deadline) {
                    if !is_settled {
                        self.is_timeout = true;
                        warn!(
                            "Axes are not settled in {} ms. Force the settle.",
                            self._config.monitor_timeout.as_millis()
                        );
                    }

                    self._channels.done_yaw.put(true);
                    self._channels.done_pitch.put(true);

                    self._deadline = Some(now + self._config.fire_timeout);
                    self.transit(MissionPhase::Fire);
                }
            }

            MissionPhase::Fire => {
                let is_returning = self._channels.returning.get();
                if is_returning || is_expired(now, self._deadline) {
                    if !is_returning {
                        warn!(
                            "Trigger does not finish in {} ms. Return anyway.",
                            self._config.fire_timeout.as_millis()
                        );
                        self._channels.run.put(true);
                        self._channels.returning.put(true);
                    }

                    self._deadline = Some(now + self._config.return_duration);
                    self.transit(MissionPhase::Return);
                }
            }

            MissionPhase::Return => {
                if is_expired(now, self._deadline) {
                    self._channels.returning.put(false);
                    self._stop.store(true, Ordering::Relaxed);

                    self._deadline = None;
                    self.transit(MissionPhase::Done);
                } else if self._channels.returning.get() {
                    self._channels.setpoint_yaw.put(self._home.0);
                    self._channels.setpoint_pitch.put(self._home.1);
                }
            }

            MissionPhase::Done => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    struct Fixture {
        task: MissionSequencerTask,
        setpoint_yaw: SharedChannel<f64>,
        setpoint_pitch: SharedChannel<f64>,
        done_yaw: SharedChannel<bool>,
        done_pitch: SharedChannel<bool>,
        run: SharedChannel<bool>,
        returning: SharedChannel<bool>,
        stop: Arc<AtomicBool>,
    }

    fn create_fixture() -> Fixture {
        let config = MissionConfig {
            start_wait: Duration::from_millis(500),
            monitor_timeout: Duration::from_millis(8000),
            fire_timeout: Duration::from_millis(2000),
            return_duration: Duration::from_millis(3000),
        };

        let setpoint_yaw = SharedChannel::new("yaw_setpoint", 0.0);
        let setpoint_pitch = SharedChannel::new("pitch_setpoint", 0.0);
        let done_yaw = SharedChannel::new("yaw_done", false);
        let done_pitch = SharedChannel::new("pitch_done", false);
        let run = SharedChannel::new("run", false);
        let returning = SharedChannel::new("returning", false);
        let stop = Arc::new(AtomicBool::new(false));

        let task = MissionSequencerTask::new(
            &config,
            (-180.0, 0.0),
            MissionChannels {
                setpoint_yaw: setpoint_yaw.clone(),
                setpoint_pitch: setpoint_pitch.clone(),
                done_yaw: done_yaw.clone(),
                done_pitch: done_pitch.clone(),
                run: run.clone(),
                returning: returning.clone(),
            },
            &stop,
        );

        Fixture {
            task,
            setpoint_yaw,
            setpoint_pitch,
            done_yaw,
            done_pitch,
            run,
            returning,
            stop,
        }
    }

    fn millis(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_step_engage() {
        let mut fixture = create_fixture();
        let begin = Instant::now();

        fixture.task.step(begin).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Engage);

        fixture.task.step(begin + millis(499)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Engage);
        assert!(!fixture.run.get());

        // Stale done flags are cleared when the monitor begins.
        fixture.done_yaw.put(true);

        fixture.task.step(begin + millis(500)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Monitor);
        assert!(fixture.run.get());
        assert!(!fixture.done_yaw.get());
        assert!(!fixture.done_pitch.get());
    }

    #[test]
    fn test_step_monitor_settled() {
        let mut fixture = create_fixture();
        let begin = Instant::now();

        fixture.task.step(begin).unwrap();
        fixture.task.step(begin + millis(500)).unwrap();

        fixture.done_yaw.put(true);
        fixture.task.step(begin + millis(1000)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Monitor);

        fixture.done_pitch.put(true);
        fixture.task.step(begin + millis(1015)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Fire);
        assert!(!fixture.task.is_timeout);
    }

    #[test]
    fn test_step_monitor_timeout() {
        let mut fixture = create_fixture();
        let begin = Instant::now();

        fixture.task.step(begin).unwrap();
        fixture.task.step(begin + millis(500)).unwrap();

        fixture.task.step(begin + millis(8499)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Monitor);
        assert!(!fixture.done_yaw.get());

        fixture.task.step(begin + millis(8500)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Fire);
        assert!(fixture.task.is_timeout);
        assert!(fixture.done_yaw.get());
        assert!(fixture.done_pitch.get());
    }

    #[test]
    fn test_step_return() {
        let mut fixture = create_fixture();
        let begin = Instant::now();

        fixture.task.step(begin).unwrap();
        fixture.task.step(begin + millis(500)).unwrap();
        fixture.task.step(begin + millis(8500)).unwrap();

        // Trigger finishes.
        fixture.returning.put(true);
        fixture.task.step(begin + millis(9000)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Return);

        fixture.setpoint_yaw.put(20.0);
        fixture.setpoint_pitch.put(10.0);
        fixture.task.step(begin + millis(9015)).unwrap();

        assert_eq!(fixture.setpoint_yaw.get(), -180.0);
        assert_eq!(fixture.setpoint_pitch.get(), 0.0);
        assert!(!fixture.stop.load(Ordering::Relaxed));

        fixture.task.step(begin + millis(12000)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Done);
        assert!(!fixture.returning.get());
        assert!(fixture.stop.load(Ordering::Relaxed));

        // Hold after the mission.
        fixture.task.step(begin + millis(20000)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Done);
    }

    #[test]
    fn test_step_fire_timeout() {
        let mut fixture = create_fixture();
        let begin = Instant::now();

        fixture.task.step(begin).unwrap();
        fixture.task.step(begin + millis(500)).unwrap();
        fixture.task.step(begin + millis(8500)).unwrap();

        // Trigger holds the axes but never reports.
        fixture.run.put(false);
        fixture.task.step(begin + millis(10499)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Fire);

        fixture.task.step(begin + millis(10500)).unwrap();
        assert_eq!(fixture.task.phase(), MissionPhase::Return);
        assert!(fixture.run.get());
        assert!(fixture.returning.get());

        fixture.task.step(begin + millis(10515)).unwrap();
        assert_eq!(fixture.setpoint_yaw.get(), -180.0);
    }
}
