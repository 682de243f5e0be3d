pub mod draft;
pub mod format;
pub mod notification;
pub mod payment;
pub mod ports;
pub mod transaction;
pub mod validation;
