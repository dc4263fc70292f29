//! Raw HID host commands.
//!
//! The transport hands whole request packets to the processor task through a [HostChannel];
//! recognised requests get a response packet of the same length back on the same channel.

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use heapless::Vec;
use sweep_common::host_command::{self as cmd, PACKET_SIZE};

use crate::layer::LayerState;

pub type Packet = [u8; PACKET_SIZE];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request(Vec<u8, PACKET_SIZE>);

impl Request {
    /// `None` if `data` is longer than a packet.
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        Vec::from_slice(data).ok().map(Self)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

pub struct HostChannel<M: RawMutex, const N: usize> {
    requests: Channel<M, Request, N>,
    responses: Channel<M, Packet, N>,
}

impl<M: RawMutex, const N: usize> Default for HostChannel<M, N> {
    fn default() -> Self {
        Self {
            requests: Channel::new(),
            responses: Channel::new(),
        }
    }
}

impl<M: RawMutex, const N: usize> HostChannel<M, N> {
    pub async fn request(&self, request: Request) {
        self.requests.send(request).await;
    }

    pub async fn receive_request(&self) -> Request {
        self.requests.receive().await
    }

    pub fn try_receive_request(&self) -> Option<Request> {
        self.requests.try_receive().ok()
    }

    /// Never waits; the response is dropped if the transport has stopped collecting them.
    pub fn respond(&self, response: Packet) {
        if self.responses.try_send(response).is_err() {
            crate::warn!("host response dropped");
        }
    }

    pub async fn response(&self) -> Packet {
        self.responses.receive().await
    }

    pub fn try_response(&self) -> Option<Packet> {
        self.responses.try_receive().ok()
    }
}

/// Handle one request. Returns false, leaving `response` untouched, when the request is not a
/// whole packet or its opcode is unknown.
pub fn receive(layers: &mut LayerState, request: &[u8], response: &mut [u8]) -> bool {
    if request.len() != PACKET_SIZE || response.len() < request.len() {
        crate::debug!("host request of {} bytes ignored", request.len());
        return false;
    }
    let opcode = request[0];
    let byte0 = match opcode {
        cmd::GET_LAYER => layers.highest(),
        _ => match cmd::set_layer_target(opcode) {
            Some(layer) if layers.move_to(layer) => opcode,
            Some(_) => return false,
            None => {
                crate::debug!("unknown host opcode {}", opcode);
                return false;
            }
        },
    };
    let response = &mut response[..request.len()];
    response.fill(0);
    response[0] = byte0;
    true
}

#[cfg(test)]
#[path = "host_command_test.rs"]
mod test;
