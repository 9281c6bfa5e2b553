//! Integration tests
//!
//! Most tests run the real HTTP client against an in-process stub backend.
//! The `live_api` tests need a running backend and are ignored by default.

mod catalog_flow;
mod live_api;
mod profile_flow;
mod support;
