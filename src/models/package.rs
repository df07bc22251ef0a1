use serde::{Deserialize, Serialize};

use crate::shop::pricing;

/// A credit package offered on the shop page. Read only, defined by the catalog
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct CreditPackage {
    pub credit_amount: u32,
    /// Price in won
    pub price: u64,
    pub is_popular: bool,
}

impl CreditPackage {
    pub const fn new(credit_amount: u32, price: u64, is_popular: bool) -> Self {
        Self {
            credit_amount,
            price,
            is_popular,
        }
    }

    /// Name shown on the payment page, e.g. "500 크레딧"
    pub fn product_name(&self) -> String {
        product_name_for(self.credit_amount)
    }

    pub fn price_label(&self) -> String {
        pricing::format_price(self.price)
    }
}

pub fn product_name_for(credit_amount: u32) -> String {
    format!("{credit_amount} 크레딧")
}

/// Credit amount a product name starts with ("500 크레딧" -> 500)
pub fn credit_amount_from_product_name(product_name: &str) -> Option<u32> {
    let digits: String = product_name
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().ok()
}

/// Finds the package matching both the credits and the price
pub fn find_package(
    catalog: &[CreditPackage],
    credit_amount: u32,
    price: u64,
) -> Option<&CreditPackage> {
    catalog
        .iter()
        .find(|p| p.credit_amount == credit_amount && p.price == price)
}
