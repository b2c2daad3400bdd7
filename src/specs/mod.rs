//! Wire schemas for upstream providers.

pub mod openai;
