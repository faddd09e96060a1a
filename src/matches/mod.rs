pub mod formation;
pub mod status;
