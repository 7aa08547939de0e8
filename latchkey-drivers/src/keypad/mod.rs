//! Keypad implementations

pub mod matrix;

pub use matrix::{MatrixKeypad, LAYOUT};
