#![no_std]
pub mod config;
pub mod firmware_functions;
pub mod host_command;
pub mod key_reporter;
pub mod keymap;
pub mod layer;
pub mod processor;
pub mod scheduler;
pub mod tap_hold;

#[macro_use]
mod macros;
