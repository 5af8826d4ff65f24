//! Pixel Arcade Storefront - checkout and fulfillment engine.
//!
//! This crate turns a cart, a shipping address, and an optional loyalty
//! reward into priced totals, then commits an order while mutating stock,
//! loyalty points, and reward inventory. Everything outside that core -
//! rendering, navigation, catalog synchronization, credential storage,
//! persistence internals - is an external collaborator behind the traits in
//! [`db`] and [`shipping`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod shipping;
