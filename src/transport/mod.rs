pub mod listener;
pub mod mode;
