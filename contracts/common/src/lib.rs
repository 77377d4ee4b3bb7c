//! # Gatekeeper Shared Types
//!
//! Types and cross-contract interfaces shared by the protected account, the
//! execution gateway and the social recovery contract.
//!
//! - [`Operation`]: the call a controller wants the protected account to make.
//! - [`Controller`]: who is acting, either a Soroban address or a relay key.
//! - [`Capability`] / [`Permissions`]: the typed capability set stored per
//!   controller in the permission registry.
//! - [`AccountInterface`] / [`GatewayInterface`]: `#[contractclient]` traits
//!   through which the contracts call each other.

#![no_std]

mod controller;
mod interfaces;
mod operation;
mod permissions;

pub use controller::Controller;
pub use interfaces::{AccountClient, AccountInterface, GatewayClient, GatewayInterface};
pub use operation::Operation;
pub use permissions::{Capability, Permissions, ALL_CAPABILITIES};
