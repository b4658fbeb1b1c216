//! Validation and derived views over a property's embedded records.
//!
//! Everything here is synchronous and works on plain values; persistence
//! lives in [`crate::store`] and [`crate::services::property_service`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::models::{
    Property, PropertyDraft, Room, SurfaceEntry, SurfaceKind, Surfaces, ValidatedProperty,
};

/// Room categories listed by [`surfaces_for_display`], in display order.
pub const ROOM_DISPLAY_ORDER: [&str; 14] = [
    "chambre",
    "sejour",
    "salon",
    "salleAManger",
    "cuisine",
    "salleDeBain",
    "salleDEau",
    "wc",
    "bureau",
    "dressing",
    "lingerie",
    "buanderie",
    "cellier",
    "garage",
];

/// Allowed gap, in currency units, between the declared fee amount and the
/// amount implied by the fee percentage.
pub const FEE_TOLERANCE: f64 = 100.0;

/// Every constraint a write violated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: impl Into<String>) {
        self.0.push(violation.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn violations(&self) -> &[String] {
        &self.0
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Human label for a room type tag, if the tag is known.
pub fn room_type_label(room_type: &str) -> Option<&'static str> {
    let label = match room_type {
        "chambre" => "Chambre",
        "sejour" => "Séjour",
        "salon" => "Salon",
        "salleAManger" => "Salle à manger",
        "cuisine" => "Cuisine",
        "salleDeBain" => "Salle de bain",
        "salleDEau" => "Salle d'eau",
        "wc" => "WC",
        "bureau" => "Bureau",
        "dressing" => "Dressing",
        "lingerie" => "Lingerie",
        "buanderie" => "Buanderie",
        "cellier" => "Cellier",
        "garage" => "Garage",
        _ => return None,
    };
    Some(label)
}

/// Gives every unnumbered room its 1-based position among rooms of the same
/// type. Rooms that already carry a number keep it.
///
/// Manual numbers are never compacted, so a manual number can equal an
/// assigned one. Such duplicates are logged, not repaired.
pub fn auto_number_rooms(rooms: &mut [Room]) {
    let mut positions: HashMap<String, u32> = HashMap::new();
    for room in rooms.iter_mut() {
        let position = positions.entry(room.room_type.clone()).or_insert(0);
        *position += 1;
        if room.number.is_none() {
            room.number = Some(*position);
        }
    }
    flag_number_collisions(rooms);
}

fn flag_number_collisions(rooms: &[Room]) {
    let mut seen: HashSet<(&str, u32)> = HashSet::new();
    for room in rooms {
        let Some(number) = room.number else { continue };
        if !seen.insert((room.room_type.as_str(), number)) {
            tracing::warn!(
                room_type = %room.room_type,
                number,
                "duplicate room number within type"
            );
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Checks the rooms of a list, naming rooms by their 1-based position.
pub fn validate_rooms(rooms: &[Room], errors: &mut ValidationErrors) {
    for (index, room) in rooms.iter().enumerate() {
        let position = index + 1;
        if room.room_type.trim().is_empty() {
            errors.push(format!("room {position}: type is required"));
        }
        if !is_positive(room.surface) {
            errors.push(format!("room {position}: surface must be positive"));
        }
    }
}

/// Numbers the rooms of a draft and checks every hard constraint, returning
/// either the validated record or all violations at once.
///
/// Soft inconsistencies (declared room count, fee arithmetic) are logged
/// and do not block the write.
pub fn prepare(draft: PropertyDraft) -> Result<ValidatedProperty, ValidationErrors> {
    let PropertyDraft {
        property_type,
        status,
        description,
        location,
        surfaces,
        price,
        mut rooms,
        total_rooms,
        levels,
        characteristics,
        orientation,
        heating,
        energy,
        building,
        energy_diagnostics,
        images,
        published_at,
    } = draft;

    auto_number_rooms(&mut rooms);

    let mut errors = ValidationErrors::new();
    if property_type.trim().is_empty() {
        errors.push("property_type is required");
    }
    if status.trim().is_empty() {
        errors.push("status is required");
    }
    validate_rooms(&rooms, &mut errors);

    match &location {
        None => errors.push("location is required"),
        Some(loc) => {
            let required = [
                ("number", loc.number.as_deref()),
                ("street", loc.street.as_deref()),
                ("postal_code", loc.postal_code.as_deref()),
                ("city", loc.city.as_deref()),
            ];
            for (field, value) in required {
                if is_blank(value) {
                    errors.push(format!("location.{field} is required"));
                }
            }
        }
    }
    match &surfaces {
        None => errors.push("surfaces is required"),
        Some(s) if !is_positive(s.habitable) => {
            errors.push("surfaces.habitable must be positive")
        }
        Some(_) => {}
    }
    match &price {
        None => errors.push("price is required"),
        Some(price) if !is_positive(price.base_price) => {
            errors.push("price.base_price must be positive")
        }
        Some(_) => {}
    }
    if description.is_none() {
        errors.push("description is required");
    }

    if let Some(declared) = total_rooms.filter(|n| *n > 0) {
        if declared as usize != rooms.len() {
            tracing::warn!(
                declared,
                actual = rooms.len(),
                "declared total_rooms does not match room list"
            );
        }
    }
    if let Some(price) = &price {
        if let (Some(pct), Some(amount)) = (price.fee_percentage, price.fee_amount) {
            let implied = price.base_price * pct / 100.0;
            if pct != 0.0 && amount != 0.0 && (implied - amount).abs() > FEE_TOLERANCE {
                tracing::warn!(
                    fee_percentage = pct,
                    fee_amount = amount,
                    implied,
                    "fee percentage and amount may not match"
                );
            }
        }
    }

    let (Some(description), Some(location), Some(surfaces), Some(price)) =
        (description, location, surfaces, price)
    else {
        return Err(errors);
    };

    errors.into_result(ValidatedProperty {
        property_type,
        status,
        description,
        location,
        surfaces,
        price,
        rooms,
        total_rooms,
        levels,
        characteristics,
        orientation,
        heating,
        energy,
        building,
        energy_diagnostics,
        images,
        published_at,
    })
}

pub fn count_rooms_of_type(rooms: &[Room], room_type: &str) -> usize {
    rooms.iter().filter(|r| r.room_type == room_type).count()
}

pub fn surface_of_type(rooms: &[Room], room_type: &str) -> f64 {
    rooms
        .iter()
        .filter(|r| r.room_type == room_type)
        .map(|r| r.surface)
        .sum()
}

/// Rooms of one type sorted by number; unnumbered rooms sort as 0.
pub fn rooms_of_type_ordered<'a>(rooms: &'a [Room], room_type: &str) -> Vec<&'a Room> {
    let mut matching: Vec<&Room> = rooms.iter().filter(|r| r.room_type == room_type).collect();
    matching.sort_by_key(|r| r.number.unwrap_or(0));
    matching
}

pub fn room_display_name(room: &Room) -> String {
    let base = match room.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => room_type_label(&room.room_type)
            .map(str::to_string)
            .unwrap_or_else(|| room.room_type.clone()),
    };
    match room.number {
        Some(number) => format!("{base} {number}"),
        None => base,
    }
}

/// Main surfaces first, then one line per room in [`ROOM_DISPLAY_ORDER`].
/// Rooms of other types are left out.
pub fn surfaces_for_display(surfaces: &Surfaces, rooms: &[Room]) -> Vec<SurfaceEntry> {
    let mut entries = vec![SurfaceEntry {
        label: "Habitable".to_string(),
        surface: surfaces.habitable,
        kind: SurfaceKind::Principale,
    }];
    for (label, value) in [("Terrain", surfaces.terrain), ("Carrez", surfaces.carrez)] {
        if let Some(surface) = value {
            entries.push(SurfaceEntry {
                label: label.to_string(),
                surface,
                kind: SurfaceKind::Principale,
            });
        }
    }

    let mut numbered = rooms.to_vec();
    auto_number_rooms(&mut numbered);
    for room_type in ROOM_DISPLAY_ORDER {
        for room in rooms_of_type_ordered(&numbered, room_type) {
            entries.push(SurfaceEntry {
                label: room_display_name(room),
                surface: room.surface,
                kind: SurfaceKind::Piece,
            });
        }
    }
    entries
}

impl Property {
    pub fn bedroom_count(&self) -> usize {
        count_rooms_of_type(&self.rooms, "chambre")
    }

    pub fn surfaces_for_display(&self) -> Vec<SurfaceEntry> {
        surfaces_for_display(&self.surfaces, &self.rooms)
    }
}

pub fn filter_min_rooms(properties: Vec<Property>, room_type: &str, min_count: usize) -> Vec<Property> {
    properties
        .into_iter()
        .filter(|p| count_rooms_of_type(&p.rooms, room_type) >= min_count)
        .collect()
}

pub fn filter_large_rooms(properties: Vec<Property>, room_type: &str, min_surface: f64) -> Vec<Property> {
    properties
        .into_iter()
        .filter(|p| {
            p.rooms
                .iter()
                .any(|r| r.room_type == room_type && r.surface >= min_surface)
        })
        .collect()
}

/// Inclusive on both bounds.
pub fn filter_surface_range(properties: Vec<Property>, min: f64, max: f64) -> Vec<Property> {
    properties
        .into_iter()
        .filter(|p| p.surfaces.habitable >= min && p.surfaces.habitable <= max)
        .collect()
}

/// Keeps properties whose every named characteristic is `true`.
pub fn filter_characteristics<S: AsRef<str>>(properties: Vec<Property>, names: &[S]) -> Vec<Property> {
    properties
        .into_iter()
        .filter(|p| match &p.characteristics {
            None => false,
            Some(c) => names.iter().all(|name| c.flag(name.as_ref()) == Some(true)),
        })
        .collect()
}

pub fn group_by_type(properties: Vec<Property>) -> BTreeMap<String, Vec<Property>> {
    let mut groups: BTreeMap<String, Vec<Property>> = BTreeMap::new();
    for property in properties {
        groups
            .entry(property.property_type.clone())
            .or_default()
            .push(property);
    }
    groups
}

pub fn average_surface_by_type(properties: Vec<Property>) -> BTreeMap<String, f64> {
    group_by_type(properties)
        .into_iter()
        .map(|(property_type, group)| {
            let total: f64 = group.iter().map(|p| p.surfaces.habitable).sum();
            (property_type, total / group.len() as f64)
        })
        .collect()
}
