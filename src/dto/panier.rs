use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{BienPanier, Panier, Property};

pub const DEFAULT_REQUEST_STATUS: &str = "en_attente";

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToPanierRequest {
    pub property_id: Uuid,
    /// Defaults to `en_attente`.
    pub request_status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePanierItemRequest {
    pub request_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PanierItemDto {
    pub id: Uuid,
    pub request_status: String,
    pub property: Property,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PanierView {
    pub panier: Option<Panier>,
    pub items: Vec<PanierItemDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddToPanierResponse {
    pub panier: Panier,
    pub item: BienPanier,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PanierList {
    #[schema(value_type = Vec<Panier>)]
    pub items: Vec<Panier>,
}
