use serde::{Deserialize, Serialize};

/// Optional purchasable extra, currently translation headphones for one
/// language. Add-ons ride the checkout payload, not the quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    pub id: String,
    pub language: String,
    pub price: f64,
}

// Per-seat application of an add-on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonSelection {
    pub seat_id: String,
    pub addon_id: String,
    pub language: String,
    pub price: f64,
}

/// Built-in translation catalog, used only when the backend add-on fetch
/// fails so the page can degrade instead of blocking checkout.
pub fn fallback_translation_addons() -> Vec<Addon> {
    [("en", 5.0), ("de", 5.0), ("fr", 5.0), ("es", 5.0)]
        .into_iter()
        .map(|(lang, price)| Addon {
            id: format!("translation-{}", lang),
            language: lang.to_string(),
            price,
        })
        .collect()
}
