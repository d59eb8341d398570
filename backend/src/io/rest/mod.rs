//! # REST API Interface Layer
//!
//! HTTP endpoints serving availability to calendar widgets. This layer only
//! translates: it validates path input, calls the availability source and
//! maps failures to status codes.

pub mod availability_apis;
