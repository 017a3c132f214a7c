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

use thiserror::Error;

/// Errors of the turret controller.
#[derive(Debug, Error)]
pub enum TurretError {
    /// The configuration file could not be read.
    #[error("failed to read the configuration: {0}")]
    ConfigRead(#[from] config::ConfigError),

    /// A configuration value is missing or has the wrong format.
    #[error("invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    /// The sensor could not be configured at startup.
    #[error("sensor configuration failed: {0}")]
    SensorConfiguration(String),

    /// A task failed and was aborted. This is never retried.
    #[error("task {task} failed: {reason}")]
    TaskFailed { task: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = TurretError::TaskFailed {
            task: String::from("camera"),
            reason: String::from("no sensor"),
        };
        assert_eq!(error.to_string(), "task camera failed: no sensor");

        let error = TurretError::InvalidParameter {
            key: String::from("period"),
            reason: String::from("should be positive"),
        };
        assert_eq!(
            error.to_string(),
            "invalid parameter 'period': should be positive"
        );
    }
}
