pub mod package;
pub mod payment;
pub mod selection;
