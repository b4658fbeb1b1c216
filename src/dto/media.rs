use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Media;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMediaRequest {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MediaList {
    #[schema(value_type = Vec<Media>)]
    pub items: Vec<Media>,
}
