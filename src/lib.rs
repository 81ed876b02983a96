// src/lib.rs — Library root for keyword-optimizer

pub mod alternatives;
pub mod api;
pub mod cli;
pub mod core;
pub mod evaluator;
pub mod infra;
pub mod seed;
