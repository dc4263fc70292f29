//! Opcodes of the raw HID host command protocol.
//!
//! Every request and response is exactly [PACKET_SIZE] bytes. Byte 0 of a request is the opcode.

pub const PACKET_SIZE: usize = 32;

pub const GET_LAYER: u8 = 0x40;

pub const SET_LAYER_0: u8 = 0x30;
pub const SET_LAYER_1: u8 = 0x31;
pub const SET_LAYER_2: u8 = 0x32;
pub const SET_LAYER_3: u8 = 0x33;

/// Returns the layer a set-layer opcode selects.
///
/// ```
/// use sweep_common::host_command::{set_layer_opcode, set_layer_target, GET_LAYER};
///
/// assert_eq!(set_layer_target(set_layer_opcode(2).unwrap()), Some(2));
/// assert_eq!(set_layer_target(GET_LAYER), None);
/// ```
pub const fn set_layer_target(opcode: u8) -> Option<u8> {
    match opcode {
        SET_LAYER_0..=SET_LAYER_3 => Some(opcode - SET_LAYER_0),
        _ => None,
    }
}

pub const fn set_layer_opcode(layer: u8) -> Option<u8> {
    if layer <= SET_LAYER_3 - SET_LAYER_0 {
        Some(SET_LAYER_0 + layer)
    } else {
        None
    }
}
