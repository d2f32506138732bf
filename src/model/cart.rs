use crate::model::FoodId;
use serde::{Deserialize, Serialize};

/// One selected item in a cart.
///
/// Carries a denormalized snapshot of the food's name/price/image taken at
/// add time, so the line still renders if the catalog entry later changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Identity of the referenced food item.
    pub food: FoodId,
    pub name: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(alias = "qty")]
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    pub fn line_total(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}

/// The wire shape of the server cart resource.
///
/// Backends disagree on field names (`items` vs `cartItems`, `qty` vs
/// `quantity`) and may omit the precomputed total; this struct absorbs all
/// of those shapes. The decoded `total` is informational only — the client
/// always recomputes from the lines (see [`Cart::total`]).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartPayload {
    #[serde(alias = "cartItems", default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// A user's staging area of selected food items prior to order creation.
///
/// Invariants:
/// - at most one line per food id;
/// - the total is derived from the lines on every read, never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a cart from a wire payload, merging any duplicate lines the
    /// backend may have produced for the same food id.
    pub fn from_payload(payload: CartPayload) -> Self {
        let mut cart = Self::default();
        for line in payload.items {
            match cart.lines.iter_mut().find(|l| l.food == line.food) {
                Some(existing) => existing.quantity += line.quantity,
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, food: &FoodId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.food == food)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Σ(price × quantity) over all lines, recomputed on every call.
    pub fn total(&self) -> u64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(food: &str, price: u64, quantity: u32) -> CartLine {
        CartLine {
            food: FoodId::from(food),
            name: food.to_string(),
            price,
            image: None,
            quantity,
        }
    }

    #[test]
    fn payload_accepts_both_field_spellings() {
        let bare: CartPayload = serde_json::from_str(
            r#"{"items": [{"food": "f1", "name": "Momo", "price": 100, "quantity": 2}]}"#,
        )
        .unwrap();
        assert_eq!(bare.items.len(), 1);
        assert_eq!(bare.total, None);

        let aliased: CartPayload = serde_json::from_str(
            r#"{"cartItems": [{"food": "f1", "name": "Momo", "price": 100, "qty": 2}], "total": 999}"#,
        )
        .unwrap();
        assert_eq!(aliased.items[0].quantity, 2);
        assert_eq!(aliased.total, Some(999));
    }

    #[test]
    fn duplicate_lines_merge_on_normalize() {
        let cart = Cart::from_payload(CartPayload {
            items: vec![line("f1", 100, 2), line("f1", 100, 1), line("f2", 50, 1)],
            total: None,
        });
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.line(&FoodId::from("f1")).unwrap().quantity, 3);
        assert_eq!(cart.total(), 350);
    }

    #[test]
    fn total_is_derived_not_the_wire_value() {
        let cart = Cart::from_payload(CartPayload {
            items: vec![line("f1", 100, 2), line("f2", 50, 1)],
            total: Some(10_000),
        });
        assert_eq!(cart.total(), 250);
    }
}
