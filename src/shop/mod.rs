//! Formatting and validation shared by the page controllers and the payment endpoint.
//!
//! Nothing in here touches ntex, sessions or templates, so it can be used from
//! templating code, the JSON endpoint and tests alike.

pub mod card;
pub mod pricing;
