pub mod classify;
pub mod outline_ops;
