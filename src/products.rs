//! Products

use serde::{Deserialize, Serialize};

/// Currency code applied when a product descriptor carries none.
pub const DEFAULT_CURRENCY: &str = "USD";

/// The kind of bookable product, resolved once when a product enters the
/// cart rather than inferred later from field shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// A multi-day or single-day tour package.
    Tour,
    /// A standalone activity or excursion.
    Activity,
    /// An airport or point-to-point transfer.
    Transfer,
}

impl ProductKind {
    /// Lowercase label for human-readable output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Tour => "tour",
            Self::Activity => "activity",
            Self::Transfer => "transfer",
        }
    }
}

/// The add-to-cart input: everything the cart snapshots about a product at
/// the moment it is added. Display fields are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDescriptor {
    /// Identifier of the underlying tour/activity/transfer.
    pub id: String,

    /// Product kind.
    pub kind: ProductKind,

    /// Display title.
    pub title: String,

    /// Unit price in minor units (cents).
    pub unit_price: u64,

    /// ISO currency code; [`DEFAULT_CURRENCY`] applies when `None`.
    pub currency: Option<String>,

    /// Optional duration label, e.g. `"3 days"`.
    pub duration_label: Option<String>,

    /// Optional image URL.
    pub image_url: Option<String>,
}

impl ProductDescriptor {
    /// Create a descriptor with the required fields and no optional metadata.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: ProductKind,
        title: impl Into<String>,
        unit_price: u64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            unit_price,
            currency: None,
            duration_label: None,
            image_url: None,
        }
    }

    /// The currency code for this descriptor, falling back to
    /// [`DEFAULT_CURRENCY`].
    #[must_use]
    pub fn currency_code(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}
