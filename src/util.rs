//! Shared utility modules used across fast-cosine components.

pub mod varint;
