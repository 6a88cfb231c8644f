//! FIR filter design and application.
//!
//! - [`design`]: windowed-sinc highpass taps.
//! - [`apply`]: overlap-add zero-phase convolution.

pub mod apply;
pub mod design;

pub use apply::{apply_fir_zero_phase, FirFilter};
pub use design::design_highpass;
