// Module exports for models

pub mod event;
pub mod interval;
pub mod selection;
pub mod settings;
