//! HomeControl console library.
//!
//! Host-side core for the HomeControl board: a background listener decodes
//! the board's `TEMP:`/`DOOR:` lines into typed events, a service applies
//! them to shared console state, and operator toggles are encoded into
//! `LAMP_*`/`PLUG_*` command lines. Presentation is left to the caller,
//! which receives [`ConsoleEvent`](app::events::ConsoleEvent)s and calls
//! into [`Console`](console::Console).

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod error;
pub mod listener;
pub mod protocol;
