// Utils compartidos

pub mod unity_ffi;

pub use unity_ffi::*;
