//! Launch execution

pub mod launcher;

pub use launcher::{EventHandler, LaunchEvent, Launcher};
