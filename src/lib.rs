//! Perch - window docking for desktop avatars
//!
//! Lets a floating, always-on-top avatar window perch on the title bar of
//! another application window and ride along with it as it moves.

pub mod config;
pub mod dock;
pub mod platform;
pub mod screen;
pub mod sim;
