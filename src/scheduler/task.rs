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

use std::time::Instant;

use crate::error::TurretError;

/// Finite-state task run by the scheduler.
pub trait Task {
    /// Name of the task.
    fn name(&self) -> &str;

    /// Name of the current state.
    fn state_name(&self) -> &str;

    /// Advance the state machine by at most one transition. The step must not
    /// block: a resource that is not ready is polled again in the next pass.
    ///
    /// # Arguments
    /// * `now` - Time of the current pass.
    ///
    /// # Errors
    /// If the task can not continue. The error is fatal and never retried.
    fn step(&mut self, now: Instant) -> Result<(), TurretError>;

    /// Command the owned actuators to the safe state. This is called once
    /// when the scheduler exits and must be safe to call in any state.
    fn shutdown(&mut self) {}
}
