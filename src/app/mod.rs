//! Application core — console logic, zero I/O.
//!
//! This module contains the business rules for the HomeControl console:
//! temperature warning evaluation, the door log, and optimistic actuator
//! toggling. All interaction with the device happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without a board.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;
