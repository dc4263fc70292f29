#![no_std]
pub mod globals;
pub mod host_command;
pub mod host_os;
pub mod keycodes;
