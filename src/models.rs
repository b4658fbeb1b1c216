use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub verified: bool,
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// Name used when addressing the user in notifications.
    pub fn greeting_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or(&self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Media {
    pub id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Panier {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One property held in a panier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BienPanier {
    pub id: Uuid,
    pub panier_id: Uuid,
    pub property_id: Uuid,
    pub request_status: String,
    pub created_at: DateTime<Utc>,
}

// Embedded property records. They are stored as JSONB and carry their own
// presence rules, checked by the property shaper rather than by serde, so
// a single request can report every missing field at once.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Location {
    pub number: Option<String>,
    pub complement: Option<String>,
    #[serde(rename = "box")]
    pub box_number: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Surfaces {
    pub habitable: f64,
    pub terrain: Option<f64>,
    /// Legal carpet area.
    pub carrez: Option<f64>,
    pub garage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Price {
    /// Asking price, fees included.
    pub base_price: f64,
    pub fee_percentage: Option<f64>,
    pub fee_amount: Option<f64>,
    pub fees_paid_by: Option<String>,
    pub net_seller: Option<f64>,
    pub annual_condo_charges: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Description {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Room {
    #[serde(rename = "type")]
    pub room_type: String,
    pub name: Option<String>,
    pub number: Option<u32>,
    pub surface: f64,
    pub orientation: Option<String>,
    pub level: Option<i32>,
    pub has_dressing: Option<bool>,
    pub has_private_bathroom: Option<bool>,
    pub has_balcony: Option<bool>,
}

impl Room {
    pub fn new(room_type: impl Into<String>, surface: f64) -> Self {
        Self {
            room_type: room_type.into(),
            surface,
            ..Self::default()
        }
    }

    pub fn numbered(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Characteristics {
    pub attic: Option<bool>,
    pub balcony: Option<bool>,
    pub cellar: Option<bool>,
    pub open_parking: Option<bool>,
    pub garden: Option<bool>,
    pub outbuilding: Option<bool>,
    pub garage_box: Option<bool>,
    pub elevator: Option<bool>,
    pub pool: Option<bool>,
    pub sewer_access: Option<bool>,
    pub terrace: Option<bool>,
}

impl Characteristics {
    /// Looks a flag up by its serialized name. Unknown names yield `None`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match name {
            "attic" => self.attic,
            "balcony" => self.balcony,
            "cellar" => self.cellar,
            "open_parking" => self.open_parking,
            "garden" => self.garden,
            "outbuilding" => self.outbuilding,
            "garage_box" => self.garage_box,
            "elevator" => self.elevator,
            "pool" => self.pool,
            "sewer_access" => self.sewer_access,
            "terrace" => self.terrace,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Orientation {
    pub garden: Option<String>,
    pub terrace: Option<String>,
    pub main: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Heating {
    pub fireplace: Option<bool>,
    pub wood_stove: Option<bool>,
    pub wood_insert: Option<bool>,
    pub pellet_stove: Option<bool>,
    pub individual_boiler: Option<bool>,
    pub underfloor: Option<bool>,
    pub individual_electric: Option<bool>,
    pub district_heating: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Energy {
    pub electricity: Option<bool>,
    pub gas: Option<bool>,
    pub fuel_oil: Option<bool>,
    pub heat_pump: Option<bool>,
    pub geothermal: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Building {
    pub construction_year: Option<i32>,
    pub co_ownership: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EnergyDiagnostics {
    pub dpe: Option<String>,
    pub ges: Option<String>,
    pub diagnosed_on: Option<NaiveDate>,
}

/// A real-estate listing ("bien immobilier") with its embedded records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub property_type: String,
    pub status: String,
    pub description: Description,
    pub location: Location,
    pub surfaces: Surfaces,
    pub price: Price,
    pub rooms: Vec<Room>,
    pub total_rooms: Option<i32>,
    pub levels: Option<i32>,
    pub characteristics: Option<Characteristics>,
    pub orientation: Option<Orientation>,
    pub heating: Option<Heating>,
    pub energy: Option<Energy>,
    pub building: Option<Building>,
    pub energy_diagnostics: Option<EnergyDiagnostics>,
    pub images: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A property as submitted by a client, before validation.
///
/// Required records are optional here so that every missing one can be
/// reported together.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PropertyDraft {
    pub property_type: String,
    pub status: String,
    pub description: Option<Description>,
    pub location: Option<Location>,
    pub surfaces: Option<Surfaces>,
    pub price: Option<Price>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    pub total_rooms: Option<i32>,
    pub levels: Option<i32>,
    pub characteristics: Option<Characteristics>,
    pub orientation: Option<Orientation>,
    pub heating: Option<Heating>,
    pub energy: Option<Energy>,
    pub building: Option<Building>,
    pub energy_diagnostics: Option<EnergyDiagnostics>,
    #[serde(default)]
    pub images: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<Property> for PropertyDraft {
    fn from(property: Property) -> Self {
        Self {
            property_type: property.property_type,
            status: property.status,
            description: Some(property.description),
            location: Some(property.location),
            surfaces: Some(property.surfaces),
            price: Some(property.price),
            rooms: property.rooms,
            total_rooms: property.total_rooms,
            levels: property.levels,
            characteristics: property.characteristics,
            orientation: property.orientation,
            heating: property.heating,
            energy: property.energy,
            building: property.building,
            energy_diagnostics: property.energy_diagnostics,
            images: property.images,
            published_at: Some(property.published_at),
        }
    }
}

/// The record fields of a property once every required part is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProperty {
    pub property_type: String,
    pub status: String,
    pub description: Description,
    pub location: Location,
    pub surfaces: Surfaces,
    pub price: Price,
    pub rooms: Vec<Room>,
    pub total_rooms: Option<i32>,
    pub levels: Option<i32>,
    pub characteristics: Option<Characteristics>,
    pub orientation: Option<Orientation>,
    pub heating: Option<Heating>,
    pub energy: Option<Energy>,
    pub building: Option<Building>,
    pub energy_diagnostics: Option<EnergyDiagnostics>,
    pub images: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl ValidatedProperty {
    /// Builds a stored property from validated fields.
    pub fn into_property(self, id: Uuid, owner_id: Uuid, now: DateTime<Utc>) -> Property {
        Property {
            id,
            owner_id,
            property_type: self.property_type,
            status: self.status,
            description: self.description,
            location: self.location,
            surfaces: self.surfaces,
            price: self.price,
            rooms: self.rooms,
            total_rooms: self.total_rooms,
            levels: self.levels,
            characteristics: self.characteristics,
            orientation: self.orientation,
            heating: self.heating,
            energy: self.energy,
            building: self.building,
            energy_diagnostics: self.energy_diagnostics,
            images: self.images,
            published_at: self.published_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Principale,
    Piece,
}

/// One line of the surface summary shown on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SurfaceEntry {
    pub label: String,
    pub surface: f64,
    #[serde(rename = "type")]
    pub kind: SurfaceKind,
}
