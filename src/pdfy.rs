//! Main module for pdfy library functionality

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod formats;
pub mod lexing;
pub mod model;
pub mod parsing;
pub mod pipeline;
pub mod semantic;
pub mod testing;
pub mod token;
