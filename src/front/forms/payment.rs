use uuid::Uuid;

use crate::{
    api::payment_form::{PaymentFormController, ProductDisplay},
    models::payment::CardInput,
    shop::pricing,
};

/// Fields posted by the payment form
#[derive(serde::Deserialize, Debug)]
pub struct CardForm {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
    #[serde(default)]
    pub card_owner: String,
    #[serde(default)]
    pub email: String,
    /// Issued with the rendered form, one in flight submission per value
    pub submission_id: Uuid,
    /// Product the page was showing when the form was posted
    pub product_name: Option<String>,
    pub product_price: Option<String>,
}

impl CardForm {
    /// Card fields with the same formatting the inputs apply while typing
    pub fn card_input(&self) -> CardInput {
        CardInput {
            card_number: PaymentFormController::on_card_number_input(&self.card_number),
            expiry_date: PaymentFormController::on_expiry_input(&self.expiry_date),
            cvv: self.cvv.trim().to_string(),
            owner_name: self.card_owner.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    /// The product shown on the page, when both hidden fields hold something usable
    pub fn displayed_product(&self) -> Option<ProductDisplay> {
        let name = self.product_name.as_deref().map(str::trim)?;
        let price = self
            .product_price
            .as_deref()
            .and_then(pricing::parse_price_label)?;

        if name.is_empty() {
            return None;
        }

        Some(ProductDisplay {
            name: name.to_string(),
            price_label: pricing::format_price(price),
        })
    }

    /// Values echoed back into the form when the page is rendered again. The cvv never is
    pub fn echo(&self) -> CardFormEcho {
        let card = self.card_input();
        CardFormEcho {
            card_number: card.card_number,
            expiry_date: card.expiry_date,
            card_owner: card.owner_name,
            email: card.email,
        }
    }
}

#[derive(serde::Serialize, Debug, Default, PartialEq)]
pub struct CardFormEcho {
    pub card_number: String,
    pub expiry_date: String,
    pub card_owner: String,
    pub email: String,
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct CardNumberQuery {
    #[serde(default)]
    pub card_number: String,
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct ExpiryDateQuery {
    #[serde(default)]
    pub expiry_date: String,
}
