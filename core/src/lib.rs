#![no_std]

pub mod bitmap;
pub mod container;
pub mod fs;
pub mod res;
