use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateInventoryItemRequest {
    #[schema(example = "Kettlebell 16kg")]
    pub name: String,
    #[schema(example = "weights")]
    pub category: String,
    #[serde(default)]
    pub quantity: i32,
    pub status: Option<String>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    /// Unit price in cents.
    #[serde(default)]
    pub unit_price: i64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateInventoryItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub status: Option<String>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub unit_price: Option<i64>,
    pub description: Option<String>,
}
