//! Knotwave library - audio-reactive torus-knot scene editing

pub mod audio;
pub mod cli;
pub mod controller;
pub mod editor;
pub mod error;
pub mod knot;
pub mod modulation;
pub mod params;
pub mod rendering;
pub mod scene;
