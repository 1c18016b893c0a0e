pub mod comparison;
pub mod derivation;
