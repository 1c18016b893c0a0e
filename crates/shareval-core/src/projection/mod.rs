pub mod comparison;
pub mod growth;
pub mod sweep;
