pub mod mc_engine;
pub mod partition;
pub mod payoffs;
