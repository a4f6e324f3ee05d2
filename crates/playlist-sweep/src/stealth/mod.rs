//! Stealth measures for browser automation.
//!
//! Patches browser fingerprint signals and paces actions like a person
//! would, so the playlist page serves the same lazy list it serves humans.

pub mod behavior;
pub mod fingerprint;
