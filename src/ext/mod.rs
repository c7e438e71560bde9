mod chrono;

#[cfg(feature = "serde")]
mod serde;
