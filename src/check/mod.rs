//! Ad-hoc diagnostics for where product images actually live.

pub mod api;
pub mod classify;
pub mod db;
