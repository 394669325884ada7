//! External process management
//!
//! This module provides the package-manager install step.

pub mod install;

pub use install::{Installer, PackageManager};
