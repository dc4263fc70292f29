use std::{future::Future, time::Duration};

use anyhow::{Result, anyhow};
use futures_lite::future::block_on;
use nusb::transfer::{Direction, EndpointType, RequestBuffer};
use sweep_common::host_command::{GET_LAYER, PACKET_SIZE, set_layer_opcode};

pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(200);

const HID_CLASS: u8 = 3;

pub type Packet = [u8; PACKET_SIZE];

pub trait KeyboardInterface {
    fn interrupt_out(&self, endpoint: u8, buf: Vec<u8>) -> Result<()>;
    fn interrupt_in(&self, endpoint: u8, max_len: usize, timeout: Duration) -> Result<Vec<u8>>;
}

impl KeyboardInterface for nusb::Interface {
    fn interrupt_out(&self, endpoint: u8, buf: Vec<u8>) -> Result<()> {
        block_on((self as &nusb::Interface).interrupt_out(endpoint, buf))
            .into_result()
            .map_err(|err| anyhow!("USB comms error: {}", err))?;
        Ok(())
    }

    fn interrupt_in(&self, endpoint: u8, max_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        let transfer = (self as &nusb::Interface).interrupt_in(endpoint, RequestBuffer::new(max_len));
        block_on_timeout(transfer, timeout)?
            .into_result()
            .map_err(|err| anyhow!("USB comms error: {}", err))
    }
}

/// Drives `fut` for at most `timeout`. A future still pending at the deadline is dropped, which
/// cancels an in-flight nusb transfer.
pub fn block_on_timeout<F: Future>(fut: F, timeout: Duration) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime
        .block_on(async { tokio::time::timeout(timeout, fut).await })
        .map_err(|_| anyhow!("Keyboard did not respond"))
}

pub struct KeyboardCtl<I: KeyboardInterface> {
    intf: I,
    epout: u8,
    epin: u8,
}

impl<I: KeyboardInterface> KeyboardCtl<I> {
    pub fn new(intf: I, epout: u8, epin: u8) -> Self {
        Self { intf, epout, epin }
    }

    /// Highest active layer.
    pub fn get_layer(&self) -> Result<u8> {
        let response = self.request(GET_LAYER)?;
        Ok(response[0])
    }

    /// Makes `layer` the only active layer. Only layers 0 to 3 are addressable.
    pub fn set_layer(&self, layer: u8) -> Result<()> {
        let opcode =
            set_layer_opcode(layer).ok_or_else(|| anyhow!("Layer {layer} is out of range"))?;
        let response = self.request(opcode)?;
        if response[0] == opcode {
            Ok(())
        } else {
            Err(anyhow!(
                "Unexpected response {:#04x} to set layer {layer}",
                response[0]
            ))
        }
    }

    fn request(&self, opcode: u8) -> Result<Packet> {
        let mut packet = [0; PACKET_SIZE];
        packet[0] = opcode;
        log::debug!("request {opcode:#04x}");
        self.intf.interrupt_out(self.epout, packet.to_vec())?;

        let data = self
            .intf
            .interrupt_in(self.epin, PACKET_SIZE, RESPONSE_TIMEOUT)?;
        log::debug!("response {:02x?}", data);
        data.as_slice()
            .try_into()
            .map_err(|_| anyhow!("Short response from keyboard: {} bytes", data.len()))
    }
}

impl KeyboardCtl<nusb::Interface> {
    /// Claims the raw HID interface: class 3, no subclass, no protocol, with interrupt
    /// endpoints in both directions.
    pub fn find_raw_hid_interface(dev: &nusb::Device) -> Result<Self> {
        let found = dev.configurations().find_map(|c| {
            c.interfaces().find_map(|i| {
                i.alt_settings().find_map(|a| {
                    if a.class() != HID_CLASS || a.subclass() != 0 || a.protocol() != 0 {
                        return None;
                    }
                    let mut epout = None;
                    let mut epin = None;
                    for ep in a
                        .endpoints()
                        .filter(|ep| ep.transfer_type() == EndpointType::Interrupt)
                    {
                        match ep.direction() {
                            Direction::Out => epout = Some(ep.address()),
                            Direction::In => epin = Some(ep.address()),
                        }
                    }
                    Some((a.interface_number(), epout?, epin?))
                })
            })
        });

        let Some((number, epout, epin)) = found else {
            return Err(anyhow!("Raw HID interface not found"));
        };
        log::info!("claiming interface {number} out {epout:#04x} in {epin:#04x}");
        let intf = dev.detach_and_claim_interface(number)?;
        Ok(Self::new(intf, epout, epin))
    }
}

#[cfg(test)]
#[path = "host_coms_test.rs"]
mod test;
