// Standalone merge commands
pub mod parameters;
pub mod sync;

// Package manager post-install flows
pub mod hook;
