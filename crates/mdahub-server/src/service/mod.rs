pub mod export;
pub mod mda;
