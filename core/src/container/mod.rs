pub mod raw;
pub mod source;
