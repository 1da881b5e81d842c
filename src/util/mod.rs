//! Stateless lexical helpers.

pub mod name;
