//! # IO Module
//!
//! Interface layer exposing the availability data to the calendar widget's
//! host pages.

pub mod rest;
