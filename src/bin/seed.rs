use std::sync::Arc;

use chrono::Utc;
use immo_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        roles::{ActiveModel as RoleActive, Column as RoleCol, Entity as Roles},
        user_roles::{ActiveModel as UserRoleActive, Column as UserRoleCol, Entity as UserRoles},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    models::{
        Characteristics, Description, Energy, Location, Price, PropertyDraft, Room, Surfaces,
    },
    services::{auth_service::hash_password, property_shaper},
    store::{PropertyFilter, PropertyStore, SeaOrmPropertyStore},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    for (name, description) in [
        ("admin", "Full access"),
        ("agent", "Publishes listings"),
        ("user", "Browses listings"),
    ] {
        ensure_role(&orm, name, description).await?;
    }

    let admin_id = ensure_user(&orm, "admin@example.com", "+33600000001", "Admin123", "admin").await?;
    let user_id = ensure_user(&orm, "user@example.com", "+33600000002", "User1234", "user").await?;
    seed_properties(orm, admin_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_role(orm: &DatabaseConnection, name: &str, description: &str) -> anyhow::Result<Uuid> {
    if let Some(role) = Roles::find().filter(RoleCol::Name.eq(name)).one(orm).await? {
        return Ok(role.id);
    }
    let role = RoleActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(Some(description.to_string())),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;
    println!("Ensured role {name}");
    Ok(role.id)
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    phone_number: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let user_id = match Users::find().filter(UserCol::Email.eq(email)).one(orm).await? {
        Some(existing) => {
            let mut active: UserActive = existing.into();
            active.role = Set(role.to_string());
            active.update(orm).await?.id
        }
        None => {
            let password_hash =
                hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            UserActive {
                id: Set(Uuid::new_v4()),
                last_name: Set(role.to_string()),
                first_name: Set(None),
                email: Set(email.to_string()),
                phone_number: Set(phone_number.to_string()),
                password_hash: Set(password_hash),
                role: Set(role.to_string()),
                verified: Set(true),
                otp: Set(None),
                otp_expires_at: Set(None),
                reset_token: Set(None),
                reset_token_expires_at: Set(None),
                registered_at: NotSet,
            }
            .insert(orm)
            .await?
            .id
        }
    };

    let role_id = ensure_role(orm, role, role).await?;
    let linked = UserRoles::find()
        .filter(UserRoleCol::UserId.eq(user_id))
        .filter(UserRoleCol::RoleId.eq(role_id))
        .one(orm)
        .await?;
    if linked.is_none() {
        UserRoleActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            role_id: Set(role_id),
        }
        .insert(orm)
        .await?;
    }

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

fn paris_location(street: &str, postal_code: &str) -> Location {
    Location {
        number: Some("12".into()),
        street: Some(street.into()),
        postal_code: Some(postal_code.into()),
        city: Some("Paris".into()),
        department: Some("75".into()),
        ..Location::default()
    }
}

async fn seed_properties(orm: DatabaseConnection, owner_id: Uuid) -> anyhow::Result<()> {
    let store = SeaOrmPropertyStore::new(Arc::new(orm));
    if store.count(&PropertyFilter::owned_by(owner_id)).await? > 0 {
        println!("Properties already seeded");
        return Ok(());
    }

    let drafts = vec![
        PropertyDraft {
            property_type: "appartement".into(),
            status: "disponible".into(),
            description: Some(Description {
                title: "T3 lumineux".into(),
                body: "Appartement traversant proche du canal.".into(),
            }),
            location: Some(paris_location("rue de Lancry", "75010")),
            surfaces: Some(Surfaces {
                habitable: 68.0,
                carrez: Some(66.5),
                ..Surfaces::default()
            }),
            price: Some(Price {
                base_price: 540_000.0,
                fee_percentage: Some(5.0),
                fee_amount: Some(27_000.0),
                ..Price::default()
            }),
            rooms: vec![
                Room::new("sejour", 28.0),
                Room::new("chambre", 12.5),
                Room::new("chambre", 11.0),
                Room::new("cuisine", 7.0),
                Room::new("salleDeBain", 4.5),
            ],
            total_rooms: Some(3),
            characteristics: Some(Characteristics {
                elevator: Some(true),
                cellar: Some(true),
                ..Characteristics::default()
            }),
            energy: Some(Energy {
                gas: Some(true),
                ..Energy::default()
            }),
            ..PropertyDraft::default()
        },
        PropertyDraft {
            property_type: "maison".into(),
            status: "disponible".into(),
            description: Some(Description {
                title: "Maison avec jardin".into(),
                body: "Maison familiale sur deux niveaux.".into(),
            }),
            location: Some(paris_location("villa Santos-Dumont", "75015")),
            surfaces: Some(Surfaces {
                habitable: 142.0,
                terrain: Some(310.0),
                ..Surfaces::default()
            }),
            price: Some(Price {
                base_price: 1_450_000.0,
                ..Price::default()
            }),
            rooms: vec![
                Room::new("salon", 40.0),
                Room::new("chambre", 16.0),
                Room::new("chambre", 13.0),
                Room::new("chambre", 10.5),
                Room::new("cuisine", 14.0),
                Room::new("garage", 18.0),
            ],
            total_rooms: Some(4),
            levels: Some(2),
            characteristics: Some(Characteristics {
                garden: Some(true),
                open_parking: Some(true),
                ..Characteristics::default()
            }),
            ..PropertyDraft::default()
        },
    ];

    for draft in drafts {
        let validated = property_shaper::prepare(draft)?;
        let property = validated.into_property(Uuid::new_v4(), owner_id, Utc::now());
        store.insert(property).await?;
    }

    println!("Seeded properties");
    Ok(())
}
