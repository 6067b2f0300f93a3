// src/transforms/mod.rs

//! Transforms of records returned by the _Readers_.

pub mod prefix;
