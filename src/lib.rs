// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests and benches can reach `quizdr::engine::*`, `quizdr::session::*`
// and friends. Some items are only exercised through the binary.
#![allow(dead_code)]

pub mod config;
pub mod engine;
pub mod repository;
pub mod session;
pub mod store;

// Terminal front end; only needed so the shared modules compile as one tree.
mod app;
mod event;
mod ui;
