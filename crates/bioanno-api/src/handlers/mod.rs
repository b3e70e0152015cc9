//! HTTP request handlers

pub mod annotator;
pub mod health;
pub mod indexes;
