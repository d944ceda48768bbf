pub mod backend;
pub mod peripheral;
pub mod protocol;
