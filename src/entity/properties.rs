use sea_orm::entity::prelude::*;

/// Embedded records (location, rooms, price, ...) live in JSONB columns.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub owner_id: Uuid,
    pub property_type: String,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub description: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub location: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub surfaces: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub price: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub rooms: Json,
    pub total_rooms: Option<i32>,
    pub levels: Option<i32>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub characteristics: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub orientation: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub heating: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub energy: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub building: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub energy_diagnostics: Option<Json>,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub published_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::media::Entity")]
    Media,
    #[sea_orm(has_many = "super::bien_paniers::Entity")]
    BienPaniers,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl Related<super::bien_paniers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BienPaniers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
