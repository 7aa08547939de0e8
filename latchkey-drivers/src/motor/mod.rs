//! Motor driver implementations

pub mod dc;

pub use dc::{DcMotor, EnablePinError, OnOffEnable};
