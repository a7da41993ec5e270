//! Rendering helpers behind `pr-cli`.

pub mod output;
