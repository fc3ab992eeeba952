//! Core business logic module
//!
//! Planning and orchestration for provisioning a Pico development host.
//! Side effects go through the [`runner::Executor`] seam, implemented in
//! [`crate::infra`].
//!
//! # Submodules
//!
//! - [`platform`] - Host platform classification
//! - [`settings`] - Layered setup configuration
//! - [`command`] - External command descriptions
//! - [`deps`] - OS package dependency resolution
//! - [`repos`] - Repository list and exported variables
//! - [`build_tool`] - Ninja/make selection
//! - [`openocd`] - OpenOCD source build
//! - [`plan`] - Declarative step list
//! - [`state`] - Resume state
//! - [`runner`] - Step execution
//! - [`doctor`] - Host tool checks

pub mod build_tool;
pub mod command;
pub mod deps;
pub mod doctor;
pub mod openocd;
pub mod plan;
pub mod platform;
pub mod repos;
pub mod runner;
pub mod settings;
pub mod state;
