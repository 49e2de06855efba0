//! `debug!` that forwards to `tracing` when the feature is enabled and
//! compiles to nothing otherwise.

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub(crate) use debug;
