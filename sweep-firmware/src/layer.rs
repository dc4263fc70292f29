use sweep_common::globals::{LAYER_COUNT_DEFAULT, MAX_LAYERS};

/// The set of active layers. Layer 0 is the base layer; lookups always fall back to it whether or
/// not its bit is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState {
    bits: u8,
    count: u8,
}

impl Default for LayerState {
    fn default() -> Self {
        Self::new(LAYER_COUNT_DEFAULT)
    }
}

impl LayerState {
    pub const fn new(count: u8) -> Self {
        let count = if count > MAX_LAYERS {
            MAX_LAYERS
        } else {
            count
        };
        Self { bits: 1, count }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn is_active(&self, layer: u8) -> bool {
        layer < self.count && self.bits & (1 << layer) != 0
    }

    pub fn activate(&mut self, layer: u8) -> bool {
        if layer >= self.count {
            crate::warn!("layer {} out of range", layer);
            return false;
        }
        let old = self.bits;
        self.bits |= 1 << layer;
        old != self.bits
    }

    pub fn deactivate(&mut self, layer: u8) -> bool {
        if layer == 0 || layer >= self.count {
            return false;
        }
        let old = self.bits;
        self.bits &= !(1 << layer);
        old != self.bits
    }

    /// Make `layer` the only active layer (besides the base fallback).
    pub fn move_to(&mut self, layer: u8) -> bool {
        if layer >= self.count {
            crate::warn!("layer {} out of range", layer);
            return false;
        }
        self.bits = 1 << layer;
        true
    }

    /// Highest active layer; 0 when only the base layer is active.
    pub fn highest(&self) -> u8 {
        match self.bits {
            0 => 0,
            bits => 7 - bits.leading_zeros() as u8,
        }
    }

    /// Active layers from highest to lowest, always ending with the base layer.
    pub fn iter_active(&self) -> impl Iterator<Item = u8> + '_ {
        (1..self.count)
            .rev()
            .filter(|l| self.bits & (1 << l) != 0)
            .chain(core::iter::once(0))
    }

    pub fn clear(&mut self) {
        self.bits = 1;
    }
}

#[cfg(test)]
#[path = "layer_test.rs"]
mod test;
