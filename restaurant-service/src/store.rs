//! Model-layer operations. Every function takes the connection it runs on, so
//! callers decide whether it runs inside a transaction or on its own.

pub mod menu;
pub mod restaurant;
