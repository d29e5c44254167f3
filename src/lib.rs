//! docap: a terminal dashboard for docker-compose projects.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod model;
pub mod view;
pub mod layout;
pub mod navigation;
pub mod templates;
pub mod controller;
pub mod config;
pub mod error;
pub mod executor;
pub mod docker;
pub mod docker_controller;
pub mod logging;
pub mod app;
