//! Local HTTP control surface
//!
//! This module exposes the debug/demo control listener that translates a
//! handful of fixed request paths into accessory registry operations. It is
//! intended for local loopback use only: no authentication, no request
//! bodies.

mod server;

pub use server::{router, SharedPlatform};
