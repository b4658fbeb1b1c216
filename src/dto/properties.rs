use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    models::{
        Building, Characteristics, Description, Energy, EnergyDiagnostics, Heating, Location,
        Orientation, Price, Property, Room, Surfaces,
    },
    routes::params::Pagination,
};

/// Partial update. Absent fields keep their stored value; a present `rooms`
/// replaces the whole list.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePropertyRequest {
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub description: Option<Description>,
    pub location: Option<Location>,
    pub surfaces: Option<Surfaces>,
    pub price: Option<Price>,
    pub rooms: Option<Vec<Room>>,
    pub total_rooms: Option<i32>,
    pub levels: Option<i32>,
    pub characteristics: Option<Characteristics>,
    pub orientation: Option<Orientation>,
    pub heating: Option<Heating>,
    pub energy: Option<Energy>,
    pub building: Option<Building>,
    pub energy_diagnostics: Option<EnergyDiagnostics>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PropertyListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomSearchQuery {
    pub room_type: String,
    pub min_count: Option<usize>,
    pub min_surface: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SurfaceSearchQuery {
    pub min_surface: Option<f64>,
    pub max_surface: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CharacteristicsQuery {
    /// Comma separated flag names, e.g. `garden,pool`.
    pub characteristics: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PropertyList {
    #[schema(value_type = Vec<Property>)]
    pub items: Vec<Property>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PropertiesByType {
    #[schema(value_type = Object)]
    pub groups: BTreeMap<String, Vec<Property>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AverageSurfaces {
    #[schema(value_type = Object)]
    pub averages: BTreeMap<String, f64>,
}

impl PropertyListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
