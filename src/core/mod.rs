//! Core processing logic for Tabula.
//!
//! This module contains the job processing pipeline:
//!
//! - [`chunk`] - Chunk planning and progress arithmetic
//! - [`controller`] - Request parsing and action dispatch
//! - [`export`] - Cross-invocation export artifact accumulation
//! - [`import`] - Single-invocation chunked import processing

pub mod chunk;
pub mod controller;
pub mod export;
pub mod import;
