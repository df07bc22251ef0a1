pub mod credit_shop;
pub mod payment;
