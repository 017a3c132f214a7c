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

//! Cooperative, non-preemptive scheduler.
//!
//! The tasks are registered once at startup. In each pass, the scheduler runs
//! every task whose period has elapsed, one step each, in descending
//! priority. Tasks with the same priority keep the registration order. A
//! task step never blocks, so exactly one step executes at any instant.

pub mod task;

use log::{error, info};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::error::TurretError;
use crate::scheduler::task::Task;

/// Profile of a registered task.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct TaskProfile {
    pub name: String,
    pub priority: u8,
    // Name of the current state.
    pub state: String,
    // Number of the executed steps.
    pub count_run: u64,
    // Total and maximum execution time of the steps in microsecond.
    pub total_time_us: u64,
    pub max_time_us: u64,
}

impl TaskProfile {
    /// Record the execution time of a step. The times saturate instead of
    /// wrapping.
    ///
    /// # Arguments
    /// * `elapsed` - Execution time of the step.
    fn record(&mut self, elapsed: Duration) {
        let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        self.count_run += 1;
        self.total_time_us = self.total_time_us.saturating_add(elapsed_us);
        self.max_time_us = self.max_time_us.max(elapsed_us);
    }
}

struct RegisteredTask {
    task: Box<dyn Task>,
    priority: u8,
    period: Duration,
    next_run: Option<Instant>,
    profile: TaskProfile,
}

pub struct Scheduler {
    _tasks: Vec<RegisteredTask>,
    _count_pass: u64,
    // An Arc instance that holds the AtomicBool instance to stop the loop.
    pub stop: Arc<AtomicBool>,
}

impl Scheduler {
    /// Create a new scheduler.
    ///
    /// # Arguments
    /// * `stop` - Flag to stop the scheduler loop.
    ///
    /// # Returns
    /// A new scheduler.
    pub fn new(stop: &Arc<AtomicBool>) -> Self {
        Self {
            _tasks: Vec::new(),
            _count_pass: 0,
            stop: stop.clone(),
        }
    }

    /// Register the task.
    ///
    /// # Arguments
    /// * `task` - Task.
    /// * `priority` - Priority. The higher value runs first.
    /// * `period` - Minimum time between two steps of the task. Zero means
    /// every pass.
    pub fn register(&mut self, task: Box<dyn Task>, priority: u8, period: Duration) {
        let profile = TaskProfile {
            name: task.name().to_string(),
            priority,
            state: task.state_name().to_string(),
            ..Default::default()
        };

        // Keep the order of registration for the same priority.
        let index = self
            ._tasks
            .iter()
            .position(|registered| registered.priority < priority)
            .unwrap_or(self._tasks.len());

        self._tasks.insert(
            index,
            RegisteredTask {
                task,
                priority,
                period,
                next_run: None,
                profile,
            },
        );
    }

    /// Number of the registered tasks.
    pub fn number_of_tasks(&self) -> usize {
        self._tasks.len()
    }

    /// Number of the executed passes.
    pub fn count_pass(&self) -> u64 {
        self._count_pass
    }

    /// Stop is requested or not.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Run one pass.
    ///
    /// # Arguments
    /// * `now` - Time of this pass.
    ///
    /// # Returns
    /// Number of the tasks that executed a step.
    ///
    /// # Errors
    /// If a task fails. The stop is requested and the remaining tasks of the
    /// pass are skipped.
    pub fn run_pass(&mut self, now: Instant) -> Result<usize, TurretError> {
        self._count_pass += 1;

        let mut count_run = 0;
        for registered in self._tasks.iter_mut() {
            if registered.next_run.is_some_and(|next_run| now < next_run) {
                continue;
            }

            let begin = Instant::now();
            let result = registered.task.step(now);
            let elapsed = begin.elapsed();

            let profile = &mut registered.profile;
            profile.record(elapsed);
            profile.state = registered.task.state_name().to_string();

            let mut next_run = registered.next_run.unwrap_or(now) + registered.period;
            if next_run <= now && !registered.period.is_zero() {
                next_run = now + registered.period;
            }
            registered.next_run = Some(next_run);

            count_run += 1;

            if let Err(task_error) = result {
                error!(
                    "Task ({}) is aborted in state {}: {task_error}.",
                    profile.name, profile.state
                );
                self.stop.store(true, Ordering::Relaxed);

                return Err(task_error);
            }
        }

        Ok(count_run)
    }

    /// Run the passes until the stop is requested.
    ///
    /// # Arguments
    /// * `limit` - Maximum running time. None means no limit.
    ///
    /// # Errors
    /// If a task fails.
    pub fn run(&mut self, limit: Option<Duration>) -> Result<(), TurretError> {
        info!("Scheduler is running with {} tasks.", self._tasks.len());

        let begin = Instant::now();
        while !self.is_stopped() {
            let now = Instant::now();
            if limit.is_some_and(|limit| now.duration_since(begin) >= limit) {
                info!("Running time reaches the limit.");
                break;
            }

            self.run_pass(now)?;

            // Sleep until the next task is due
            if let Some(next_run) = self._tasks.iter().filter_map(|task| task.next_run).min() {
                let now = Instant::now();
                if next_run > now {
                    sleep(next_run - now);
                }
            }
        }

        info!("Scheduler is stopped after {} passes.", self._count_pass);

        Ok(())
    }

    /// Shut down all the tasks. The actuators are commanded to the safe
    /// state.
    pub fn shutdown(&mut self) {
        for registered in self._tasks.iter_mut() {
            registered.task.shutdown();
            info!("Task ({}) is shut down.", registered.profile.name);
        }
    }

    /// Profiles of the tasks in the order of execution.
    pub fn profiles(&self) -> Vec<TaskProfile> {
        self._tasks
            .iter()
            .map(|registered| registered.profile.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    // Task that records its name in the shared log at each step.
    struct RecordTask {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
        fail_at: Option<u64>,
        count: u64,
        count_shutdown: Rc<RefCell<u32>>,
    }

    impl Task for RecordTask {
        fn name(&self) -> &str {
            &self.name
        }

        fn state_name(&self) -> &str {
            "Run"
        }

        fn step(&mut self, _now: Instant) -> Result<(), TurretError> {
            self.count += 1;
            self.log.borrow_mut().push(self.name.clone());

            if self.fail_at == Some(self.count) {
                return Err(TurretError::TaskFailed {
                    task: self.name.clone(),
                    reason: String::from("test"),
                });
            }

            Ok(())
        }

        fn shutdown(&mut self) {
            *self.count_shutdown.borrow_mut() += 1;
        }
    }

    fn create_task(
        name: &str,
        log: &Rc<RefCell<Vec<String>>>,
        count_shutdown: &Rc<RefCell<u32>>,
    ) -> Box<RecordTask> {
        Box::new(RecordTask {
            name: name.to_string(),
            log: log.clone(),
            fail_at: None,
            count: 0,
            count_shutdown: count_shutdown.clone(),
        })
    }

    fn create_scheduler() -> (Scheduler, Rc<RefCell<Vec<String>>>, Rc<RefCell<u32>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let count_shutdown = Rc::new(RefCell::new(0));

        let mut scheduler = Scheduler::new(&Arc::new(AtomicBool::new(false)));
        scheduler.register(create_task("camera", &log, &count_shutdown), 1, Duration::ZERO);
        scheduler.register(create_task("yaw", &log, &count_shutdown), 9, Duration::ZERO);
        scheduler.register(create_task("pitch", &log, &count_shutdown), 9, Duration::ZERO);
        scheduler.register(create_task("mission", &log, &count_shutdown), 10, Duration::ZERO);
        scheduler.register(create_task("trigger", &log, &count_shutdown), 10, Duration::ZERO);

        (scheduler, log, count_shutdown)
    }

    #[test]
    fn test_register() {
        let (scheduler, _, _) = create_scheduler();

        assert_eq!(scheduler.number_of_tasks(), 5);

        let names: Vec<String> = scheduler
            .profiles()
            .iter()
            .map(|profile| profile.name.clone())
            .collect();
        assert_eq!(names, vec!["mission", "trigger", "yaw", "pitch", "camera"]);
    }

    #[test]
    fn test_run_pass_priority_order() {
        let (mut scheduler, log, _) = create_scheduler();

        assert_eq!(scheduler.run_pass(Instant::now()).unwrap(), 5);
        assert_eq!(
            *log.borrow(),
            vec!["mission", "trigger", "yaw", "pitch", "camera"]
        );

        assert_eq!(scheduler.count_pass(), 1);
        assert!(scheduler.profiles().iter().all(|profile| profile.count_run == 1));
    }

    #[test]
    fn test_profile_record_saturates() {
        let mut profile = TaskProfile::default();

        profile.record(Duration::from_micros(10));
        profile.record(Duration::MAX);
        profile.record(Duration::from_micros(5));

        assert_eq!(profile.count_run, 3);
        assert_eq!(profile.total_time_us, u64::MAX);
        assert_eq!(profile.max_time_us, u64::MAX);
    }

    #[test]
    fn test_run_pass_period() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let count_shutdown = Rc::new(RefCell::new(0));

        let mut scheduler = Scheduler::new(&Arc::new(AtomicBool::new(false)));
        scheduler.register(
            create_task("slow", &log, &count_shutdown),
            1,
            Duration::from_millis(30),
        );
        scheduler.register(
            create_task("fast", &log, &count_shutdown),
            2,
            Duration::from_millis(15),
        );

        let begin = Instant::now();
        for idx in 0..4 {
            scheduler
                .run_pass(begin + Duration::from_millis(15 * idx))
                .unwrap();
        }

        assert_eq!(
            *log.borrow(),
            vec!["fast", "slow", "fast", "fast", "slow", "fast"]
        );
    }

    #[test]
    fn test_run_pass_task_fails() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let count_shutdown = Rc::new(RefCell::new(0));

        let stop = Arc::new(AtomicBool::new(false));
        let mut scheduler = Scheduler::new(&stop);

        let mut task = create_task("broken", &log, &count_shutdown);
        task.fail_at = Some(1);
        scheduler.register(task, 5, Duration::ZERO);
        scheduler.register(create_task("other", &log, &count_shutdown), 1, Duration::ZERO);

        assert!(matches!(
            scheduler.run_pass(Instant::now()),
            Err(TurretError::TaskFailed { .. })
        ));
        assert!(stop.load(Ordering::Relaxed));

        // The lower priority task is skipped.
        assert_eq!(*log.borrow(), vec!["broken"]);

        // Error stops the loop as well.
        assert!(scheduler.run(None).is_ok());
    }

    #[test]
    fn test_run_stop() {
        let (mut scheduler, log, _) = create_scheduler();
        scheduler.stop.store(true, Ordering::Relaxed);

        assert!(scheduler.run(None).is_ok());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_run_limit() {
        let (mut scheduler, log, _) = create_scheduler();

        assert!(scheduler.run(Some(Duration::from_millis(5))).is_ok());
        assert!(!log.borrow().is_empty());
        assert!(!scheduler.is_stopped());
    }

    #[test]
    fn test_shutdown() {
        let (mut scheduler, _, count_shutdown) = create_scheduler();

        scheduler.shutdown();

        assert_eq!(*count_shutdown.borrow(), 5);
    }
}
