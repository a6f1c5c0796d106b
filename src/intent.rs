//! What the caller is looking for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic goal of an element lookup.
///
/// Every per-intent table in the crate matches on this enum exhaustively, so a
/// new variant does not compile until each generator says what it does for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// The site-wide search box.
    Search,
    /// A product card or listing tile.
    Product,
    /// The cart button or panel.
    Cart,
    /// The login / sign-in entry point.
    Login,
    /// A price label.
    Price,
    /// A quantity stepper or input.
    Quantity,
    /// The checkout button.
    Checkout,
    /// A phone number input.
    Phone,
    /// A one-time-code input.
    Otp,
}

impl Intent {
    /// All intents, in declaration order.
    pub const ALL: [Intent; 9] = [
        Intent::Search,
        Intent::Product,
        Intent::Cart,
        Intent::Login,
        Intent::Price,
        Intent::Quantity,
        Intent::Checkout,
        Intent::Phone,
        Intent::Otp,
    ];

    /// Lowercase name, as used in configs and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Search => "search",
            Intent::Product => "product",
            Intent::Cart => "cart",
            Intent::Login => "login",
            Intent::Price => "price",
            Intent::Quantity => "quantity",
            Intent::Checkout => "checkout",
            Intent::Phone => "phone",
            Intent::Otp => "otp",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error for an unrecognized intent name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown intent '{0}' (expected one of: search, product, cart, login, price, quantity, checkout, phone, otp)")]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Intent::ALL
            .into_iter()
            .find(|i| i.as_str() == name)
            .ok_or_else(|| UnknownIntent(s.trim().to_string()))
    }
}
