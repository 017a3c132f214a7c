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

//! # Turret Control System
//!
//! This library coordinates a two-axis turret that aims at a thermally
//! detected target and fires a servo-driven trigger. Cooperating
//! finite-state tasks run on a single-threaded, priority-ordered scheduler
//! and talk to each other only through single-slot shared channels.
pub mod application;
pub mod camera;
pub mod channel;
pub mod config;
pub mod constants;
pub mod control;
pub mod driver;
pub mod enums;
pub mod error;
pub mod mock;
pub mod model;
pub mod scheduler;
pub mod task;
pub mod utility;
