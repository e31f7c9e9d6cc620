//! Search engine backends.

pub mod elasticsearch;
