#![forbid(unsafe_code)]

pub mod collaborators;
pub mod constants;
pub mod controller;
pub mod gui;
pub mod hotkeys;
pub mod settings;
pub mod toggle;
pub mod widgets;
