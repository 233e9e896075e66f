pub mod kepler;
pub mod readout;
