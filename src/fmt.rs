//! Logging shims.
//!
//! Routes to `log` with the `std` feature and to `defmt` on embedded targets.
//! Without either, log statements compile to nothing.

#![allow(unused_macros)]

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        ::log::debug!($($arg)*);
        #[cfg(all(feature = "defmt", not(feature = "std")))]
        ::defmt::debug!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        ::log::info!($($arg)*);
        #[cfg(all(feature = "defmt", not(feature = "std")))]
        ::defmt::info!($($arg)*);
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        ::log::warn!($($arg)*);
        #[cfg(all(feature = "defmt", not(feature = "std")))]
        ::defmt::warn!($($arg)*);
    }};
}
