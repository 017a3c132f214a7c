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

use config::Config;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::TurretError;

/// Trait for parsing the configuration value.
///
/// # Parameters
/// * `Self` - Type of the configuration value.
pub trait ConfigValue: Sized {
    /// Parse the configuration value.
    ///
    /// # Parameters
    /// * `s` - String to parse.
    ///
    /// # Returns
    /// The parsed configuration value or the reason of failure.
    fn parse_value(s: &str) -> Result<Self, String>;
}

impl ConfigValue for String {
    fn parse_value(s: &str) -> Result<Self, String> {
        Ok(s.to_string())
    }
}

impl ConfigValue for f64 {
    fn parse_value(s: &str) -> Result<Self, String> {
        s.parse::<f64>()
            .map_err(|_| format!("{s} should parse as f64"))
    }
}

impl ConfigValue for usize {
    fn parse_value(s: &str) -> Result<Self, String> {
        s.parse::<usize>()
            .map_err(|_| format!("{s} should parse as usize"))
    }
}

impl ConfigValue for u8 {
    fn parse_value(s: &str) -> Result<Self, String> {
        s.parse::<u8>().map_err(|_| format!("{s} should parse as u8"))
    }
}

impl ConfigValue for u64 {
    fn parse_value(s: &str) -> Result<Self, String> {
        s.parse::<u64>()
            .map_err(|_| format!("{s} should parse as u64"))
    }
}

impl ConfigValue for bool {
    fn parse_value(s: &str) -> Result<Self, String> {
        s.parse::<bool>()
            .map_err(|_| format!("{s} should parse as bool"))
    }
}

/// Get the configuation from the file.
///
/// # Parameters
/// * `filepath` - Path to the config file.
///
/// # Returns
/// The configuration.
///
/// # Errors
/// If the file can not be read or parsed.
pub fn get_config(filepath: &Path) -> Result<Config, TurretError> {
    let name = filepath.to_str().ok_or(TurretError::InvalidParameter {
        key: String::from("filepath"),
        reason: format!("{:?} is not a valid path", filepath),
    })?;

    Ok(Config::builder()
        .add_source(config::File::with_name(name))
        .build()?)
}

/// Get the parameter from the configuration.
///
/// # Parameters
/// * `config` - Configuration.
/// * `key` - Key to find the parameter in the configuration.
///
/// # Returns
/// The parameter.
///
/// # Errors
/// If the key does not exist or the value can not be parsed.
pub fn get_parameter<T: ConfigValue>(config: &Config, key: &str) -> Result<T, TurretError> {
    let value = config.get_string(key)?;

    T::parse_value(&value).map_err(|reason| TurretError::InvalidParameter {
        key: key.to_string(),
        reason,
    })
}

/// Get the array parameter from the configuration.
///
/// # Parameters
/// * `config` - Configuration.
/// * `key` - Key to find the parameter in the configuration.
///
/// # Returns
/// The array parameter.
///
/// # Errors
/// If the key does not exist or any element can not be parsed.
pub fn get_parameter_array<T: ConfigValue>(
    config: &Config,
    key: &str,
) -> Result<Vec<T>, TurretError> {
    config
        .get_array(key)?
        .into_iter()
        .map(|value| {
            let text = value.into_string()?;
            T::parse_value(&text).map_err(|reason| TurretError::InvalidParameter {
                key: key.to_string(),
                reason,
            })
        })
        .collect()
}

/// Milliseconds to the duration.
pub fn millis(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Is the deadline reached or not.
///
/// # Arguments
/// * `now` - Current time.
/// * `deadline` - Deadline. None means no deadline is set.
///
/// # Returns
/// True if there is a deadline and it is reached. Otherwise, false.
pub fn is_expired(now: Instant, deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| now >= deadline)
}
