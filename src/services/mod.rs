// Service module exports

pub mod layout;
pub mod notification;
pub mod selection;
pub mod settings;
