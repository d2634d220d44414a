//! Neu.ro Config Client - async HTTP client for the config service
//!
//! This crate provides [`ConfigClient`], covering the service's:
//!
//! - cloud provider options
//! - clusters, their storages and node pools
//! - resource presets
//! - cluster notifications
//!
//! # Overview
//!
//! The client handles authentication, URL building, request payloads,
//! response parsing and error classification. Entities and errors come from
//! `neuro-config-core`.

mod client;
mod endpoints;
mod payload;

pub use client::ConfigClient;
