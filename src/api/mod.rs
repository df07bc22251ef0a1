//! # API Module
//!
//! Business logic of the shop, free of any web framework types.
//!
//! ## Modules
//!
//! - [`credit_shop`] - package picker controller
//! - [`payment_form`] - payment page controller
//! - [`payment`] - payment endpoint processing

pub mod credit_shop;
pub mod payment;
pub mod payment_form;
