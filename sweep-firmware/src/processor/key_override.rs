use sweep_common::keycodes::{kc, modifiers};

/// Replaces one keycode with another while some modifiers are active.
///
/// With `consume` set, a partial match of `trigger_mods` is taken out of the report for the
/// alternate key (so shift+backspace sends a bare delete) and put back afterwards. A full match
/// is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyOverride {
    pub trigger: u16,
    pub trigger_mods: u8,
    pub primary: u16,
    pub alternate: u16,
    pub consume: bool,
    registered: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverridePress {
    pub code: u16,
    /// Modifier bits to remove from the report while `code` goes down.
    pub consumed: u8,
}

impl KeyOverride {
    pub const fn new(
        trigger: u16,
        trigger_mods: u8,
        primary: u16,
        alternate: u16,
        consume: bool,
    ) -> Self {
        Self {
            trigger,
            trigger_mods,
            primary,
            alternate,
            consume,
            registered: kc::NO,
        }
    }

    pub const fn backspace_delete() -> Self {
        Self::new(kc::BSPC, modifiers::MASK_SHIFT, kc::BSPC, kc::DEL, true)
    }

    pub const fn grave_escape() -> Self {
        Self::new(
            kc::GESC,
            modifiers::MASK_SHIFT | modifiers::MASK_GUI,
            kc::ESCAPE,
            kc::GRV,
            false,
        )
    }

    pub fn registered(&self) -> u16 {
        self.registered
    }

    pub fn press(&mut self, held: u8, oneshot: u8) -> OverridePress {
        let active = (held | oneshot) & self.trigger_mods;
        let code = if active == 0 {
            self.primary
        } else {
            self.alternate
        };
        self.registered = code;
        OverridePress {
            code,
            consumed: if self.consume && active != 0 && active != self.trigger_mods {
                active
            } else {
                0
            },
        }
    }

    /// The keycode to release; the one chosen at press time even if the modifiers changed since.
    pub fn release(&mut self) -> Option<u16> {
        match core::mem::replace(&mut self.registered, kc::NO) {
            kc::NO => None,
            code => Some(code),
        }
    }

    pub fn clear(&mut self) {
        self.registered = kc::NO;
    }
}

#[cfg(test)]
#[path = "key_override_test.rs"]
mod test;
