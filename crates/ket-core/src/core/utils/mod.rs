pub mod classify;
pub mod geometry;
