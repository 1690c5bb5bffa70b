pub mod manage;
pub mod practice;
pub mod stats;
