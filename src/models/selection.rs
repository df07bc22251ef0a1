use serde::Serialize;

use crate::{
    consts,
    models::package::{CreditPackage, product_name_for},
    services::{SessionStore, StorageError},
    shop::pricing,
};

/// Package chosen on the shop page, carried to the payment page through the session store
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Selection {
    pub selected_credit: u32,
    pub selected_price: u64,
    pub product_name: String,
}

impl From<&CreditPackage> for Selection {
    fn from(package: &CreditPackage) -> Self {
        Selection {
            selected_credit: package.credit_amount,
            selected_price: package.price,
            product_name: package.product_name(),
        }
    }
}

impl Selection {
    /// Writes the three keys. A failed write removes all of them, so no half written
    /// selection is ever left behind
    pub fn write_to(&self, store: &dyn SessionStore) -> Result<(), StorageError> {
        let items = [
            (consts::SELECTED_CREDIT_KEY, self.selected_credit.to_string()),
            (consts::SELECTED_PRICE_KEY, self.selected_price.to_string()),
            (consts::PRODUCT_NAME_KEY, self.product_name.clone()),
        ];

        for (key, value) in &items {
            if let Err(e) = store.set_item(key, value) {
                Self::clear(store);
                return Err(e);
            }
        }

        Ok(())
    }

    /// Reads the selection back. Missing, empty or non numeric credit/price values count as no selection
    pub fn read_from(store: &dyn SessionStore) -> Result<Option<Self>, StorageError> {
        let credit = store.get_item(consts::SELECTED_CREDIT_KEY)?;
        let price = store.get_item(consts::SELECTED_PRICE_KEY)?;

        let (Some(selected_credit), Some(selected_price)) = (
            credit.as_deref().and_then(|c| c.parse::<u32>().ok()),
            price.as_deref().and_then(pricing::parse_digits),
        ) else {
            return Ok(None);
        };

        let product_name = store
            .get_item(consts::PRODUCT_NAME_KEY)?
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| product_name_for(selected_credit));

        Ok(Some(Self {
            selected_credit,
            selected_price,
            product_name,
        }))
    }

    pub fn clear(store: &dyn SessionStore) {
        store.remove_item(consts::SELECTED_CREDIT_KEY);
        store.remove_item(consts::SELECTED_PRICE_KEY);
        store.remove_item(consts::PRODUCT_NAME_KEY);
    }

    pub fn price_label(&self) -> String {
        pricing::format_price(self.selected_price)
    }
}
