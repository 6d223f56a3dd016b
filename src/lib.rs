// src/lib.rs

pub mod bsp;
pub mod map;
pub mod utils;
