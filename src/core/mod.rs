pub mod analyzer;
pub mod controller;
pub mod engine;
pub mod oscillator;
pub mod scheduler;
pub mod session;
pub mod tick;
