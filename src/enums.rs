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
use strum_macros::{AsRefStr, EnumIter, FromRepr};

/// Axis of the turret.
#[derive(
    FromRepr, Debug, PartialEq, Clone, Copy, Hash, Eq, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Axis {
    Yaw = 1,
    Pitch = 2,
}

/// Phase of the mission. Owned by the mission sequencer.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, AsRefStr, Serialize)]
#[repr(u8)]
pub enum MissionPhase {
    WaitStart = 1,
    Engage = 2,
    Monitor = 3,
    Fire = 4,
    Return = 5,
    Done = 6,
}

/// State of the camera acquisition task.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, AsRefStr)]
#[repr(u8)]
pub enum CameraState {
    Init = 1,
    AcquireImage = 2,
    EstimateTarget = 3,
}

/// State of the axis control task.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, AsRefStr)]
#[repr(u8)]
pub enum AxisState {
    Init = 1,
    Idle = 2,
    Track = 3,
}

/// State of the trigger task.
#[derive(FromRepr, Debug, PartialEq, Clone, Copy, AsRefStr)]
#[repr(u8)]
pub enum TriggerState {
    Init = 1,
    Armed = 2,
    Firing = 3,
    ResetWait = 4,
    IdleDone = 5,
}
