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

use log::{error, info};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag::register,
};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error::TurretError;
use crate::mock::mock_turret::MockTurret;
use crate::model::Model;

/// Run the application.
///
/// # Arguments
/// * `config_file` - Configuration file.
/// * `limit` - Maximum running time. None means the mission decides when to
/// stop.
///
/// # Errors
/// If the configuration can not be read or a task fails. The actuators are
/// commanded to the safe state in any case once the tasks are created.
pub fn run(config_file: &Path, limit: Option<Duration>) -> Result<(), TurretError> {
    info!("Run the turret control system in simulation mode.");

    let config = Config::new(config_file)?;
    info!("Configuration is loaded from {}.", config.filename);

    // The hardware drivers are external, so the turret is simulated.
    let (_turret, hardware) = MockTurret::new(&config);

    // Create the model
    let mut model = Model::new(&config, hardware);

    // Register the signals that stop the application
    for signal in [SIGTERM, SIGINT].iter() {
        if let Err(register_error) = register(*signal, model.stop.clone()) {
            error!("Failed to register the signal {signal}: {register_error}.");
        }
    }

    // Run the main loop
    let result = model.run(limit);

    info!("Stopping the turret control system...");
    model.shutdown();

    info!("Report: {}", model.report());
    info!("Turret control system is stopped.");

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::constants::DEFAULT_CONFIG_FILE;

    #[test]
    fn test_run_limit() {
        assert!(run(
            Path::new(DEFAULT_CONFIG_FILE),
            Some(Duration::from_millis(100))
        )
        .is_ok());
    }

    #[test]
    fn test_run_no_config() {
        assert!(matches!(
            run(Path::new("config/not_exist.yaml"), None),
            Err(TurretError::ConfigRead(_))
        ));
    }
}
