use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// UUID of the material
    pub id: Uuid,
    /// The project this material is needed for
    pub project_id: Uuid,
    /// Name of the item (e.g. "Wood Glue")
    pub name: String,
    /// Price of the item. Stored records may carry `null` here (older
    /// versions wrote NaN prices as null), which loads as 0
    #[serde(default, deserialize_with = "price_or_zero")]
    pub price: f64,
    /// Whether the item has been purchased
    #[serde(default)]
    pub is_bought: bool,
    /// Optional shop or reference URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Material {
    /// Price as used in cost summation: NaN counts as 0 so a single bad
    /// entry cannot poison a total.
    pub fn effective_price(&self) -> f64 {
        if self.price.is_nan() { 0.0 } else { self.price }
    }
}

fn price_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = Option::<f64>::deserialize(deserializer)?;
    Ok(price.unwrap_or(0.0))
}

/// Partial update for a material. Only fields carrying `Some` are applied.
#[derive(Default, Clone)]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub is_bought: Option<bool>,
    pub link: Option<String>,
}

impl MaterialPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.is_bought.is_none()
            && self.link.is_none()
    }

    pub fn apply(self, material: &mut Material) {
        if let Some(name) = self.name {
            material.name = name;
        }
        if let Some(price) = self.price {
            material.price = price;
        }
        if let Some(is_bought) = self.is_bought {
            material.is_bought = is_bought;
        }
        if let Some(link) = self.link {
            material.link = Some(link);
        }
    }
}
