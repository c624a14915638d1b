//! Product catalog model

use serde::{Deserialize, Serialize};

/// A scannable product, keyed by barcode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub barcode: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub packaging_recyclable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packaging_material: Option<String>,
    /// Comma-separated ingredient list as printed on the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
