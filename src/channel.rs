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

//! Single-slot shared variables between the tasks.
//!
//! A channel keeps only the latest value: `put()` overwrites, `get()` never
//! blocks. All tasks run on one thread and only one task step executes at a
//! time, so the slot is a plain `Cell` without any lock. Each channel has one
//! logical writer per mission phase, which is documented where the channel
//! is created. The tasks that only read a channel hold a `ChannelReader`.

use serde::Serialize;
use serde_json::{json, Value};
use std::cell::Cell;
use std::rc::Rc;

struct Slot<T> {
    name: String,
    default: T,
    value: Cell<Option<T>>,
    count_write: Cell<u64>,
}

/// Channel with the capability to write and read.
#[derive(Clone)]
pub struct SharedChannel<T: Copy> {
    _slot: Rc<Slot<T>>,
}

/// Read-only view of a channel.
#[derive(Clone)]
pub struct ChannelReader<T: Copy> {
    _slot: Rc<Slot<T>>,
}

impl<T: Copy> SharedChannel<T> {
    /// Create a new channel.
    ///
    /// # Arguments
    /// * `name` - Name of the channel used in the diagnostics.
    /// * `default` - Value returned by `get()` before any `put()`.
    ///
    /// # Returns
    /// A new channel.
    pub fn new(name: &str, default: T) -> Self {
        Self {
            _slot: Rc::new(Slot {
                name: name.to_string(),
                default,
                value: Cell::new(None),
                count_write: Cell::new(0),
            }),
        }
    }

    /// Put the value and replace the existing one.
    pub fn put(&self, value: T) {
        self._slot.value.set(Some(value));
        self._slot
            .count_write
            .set(self._slot.count_write.get().saturating_add(1));
    }

    /// Get the latest value, or the default if nothing was put.
    pub fn get(&self) -> T {
        self._slot.value.get().unwrap_or(self._slot.default)
    }

    /// Name of the channel.
    pub fn name(&self) -> &str {
        &self._slot.name
    }

    /// Number of the writes since creation.
    pub fn count_write(&self) -> u64 {
        self._slot.count_write.get()
    }

    /// Create a reader that shares the slot.
    pub fn reader(&self) -> ChannelReader<T> {
        ChannelReader {
            _slot: self._slot.clone(),
        }
    }
}

impl<T: Copy + Serialize> SharedChannel<T> {
    /// Snapshot of the channel for the diagnostics.
    ///
    /// # Returns
    /// Name, latest value and number of the writes.
    pub fn snapshot(&self) -> Value {
        json!({
            "name": self.name(),
            "value": self.get(),
            "count_write": self.count_write(),
        })
    }
}

impl<T: Copy> ChannelReader<T> {
    /// Get the latest value, or the default if nothing was put.
    pub fn get(&self) -> T {
        self._slot.value.get().unwrap_or(self._slot.default)
    }

    /// Name of the channel.
    pub fn name(&self) -> &str {
        &self._slot.name
    }
}
