//! Logging for the firmware core.
//!
//! `debug!`, `info!`, `warn!` and `error!` go to `defmt` on the target, to stderr under test or
//! with the `test-utils` feature, and nowhere otherwise. Format strings must stay within the
//! `{}` / `{:?}` subset both `defmt` and `core::fmt` accept.
//!
//! ```rust
//! # #[macro_use] extern crate sweep_firmware;
//! # fn main() {
//! let layer = 2;
//! let opcode = 0x32;
//! debug!("layer {} from {:?}", layer, opcode);
//! # }
//! ```

#[cfg(any(test, feature = "test-utils"))]
mod stderr {
    #[doc(hidden)]
    #[macro_export]
    macro_rules! __sweep_log {
        (error, $($arg:expr),*) => {{
            extern crate std;
            let message = std::format!($($arg),*);
            if cfg!(test) {
                panic!("{}", message);
            }
            std::eprintln!("ERROR ./{}:{}: {}", file!(), line!(), message);
        }};
        ($level:ident, $($arg:expr),*) => {{
            extern crate std;
            std::eprintln!("{} {}", stringify!($level), std::format!($($arg),*));
        }};
    }
}

#[cfg(all(feature = "defmt", not(any(test, feature = "test-utils"))))]
mod target {
    #[doc(hidden)]
    #[macro_export]
    macro_rules! __sweep_log {
        ($level:ident, $($arg:expr),*) => {
            defmt::$level!($($arg),*)
        };
    }
}

#[cfg(not(any(test, feature = "defmt", feature = "test-utils")))]
mod silent {
    #[doc(hidden)]
    #[macro_export]
    macro_rules! __sweep_log {
        ($level:ident, $($arg:expr),*) => {{
            let _ = ($($arg),*);
        }};
    }
}

#[macro_export]
macro_rules! debug {
    ($($arg:expr),*) => { $crate::__sweep_log!(debug, $($arg),*) };
}

#[macro_export]
macro_rules! info {
    ($($arg:expr),*) => { $crate::__sweep_log!(info, $($arg),*) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:expr),*) => { $crate::__sweep_log!(warn, $($arg),*) };
}

/// Panics under `cfg(test)`.
#[macro_export]
macro_rules! error {
    ($($arg:expr),*) => { $crate::__sweep_log!(error, $($arg),*) };
}
