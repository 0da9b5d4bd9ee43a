//! Storefront REST transport.

pub mod client;
pub mod dto;

pub use client::StorefrontClient;
