//! API route handlers

pub mod alarm;
pub mod drowsy;
pub mod events;
pub mod nap;
