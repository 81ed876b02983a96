// src/core/mod.rs — Keyword data model and the optimization loop

pub mod collection;
pub mod context;
pub mod optimizer;
pub mod registry;
pub mod round;
pub mod types;
