pub mod gaussian;
pub mod resample;
