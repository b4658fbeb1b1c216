mod common;

use immo_api::{
    dto::properties::{
        CharacteristicsQuery, PropertyListQuery, RoomSearchQuery, SurfaceSearchQuery,
        UpdatePropertyRequest,
    },
    error::AppError,
    models::{Characteristics, Room},
    services::property_service,
};

use common::{auth, draft, memory_state};

#[tokio::test]
async fn create_stores_numbered_property_owned_by_caller() -> anyhow::Result<()> {
    let state = memory_state();
    let owner = auth("agent");

    let resp = property_service::create_property(
        &state,
        &owner,
        draft(
            "appartement",
            65.0,
            vec![
                Room::new("chambre", 12.0),
                Room::new("sejour", 25.0),
                Room::new("chambre", 10.0),
            ],
        ),
    )
    .await?;
    let created = resp.data.expect("created property");
    assert_eq!(created.owner_id, owner.user_id);

    let stored = state
        .properties
        .find_by_id(created.id)
        .await?
        .expect("stored property");
    let numbers: Vec<Option<u32>> = stored.rooms.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![Some(1), Some(1), Some(2)]);
    assert_eq!(stored, created);
    Ok(())
}

#[tokio::test]
async fn create_rejects_invalid_draft() {
    let state = memory_state();
    let mut bad = draft("maison", 90.0, vec![Room::new("chambre", 0.0)]);
    bad.location = None;

    let err = property_service::create_property(&state, &auth("agent"), bad)
        .await
        .expect_err("invalid draft");
    match err {
        AppError::Validation(errors) => {
            assert!(errors.violations().contains(&"location is required".to_string()));
            assert!(
                errors
                    .violations()
                    .contains(&"room 1: surface must be positive".to_string())
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        state
            .properties
            .count(&Default::default())
            .await
            .expect("count"),
        0
    );
}

#[tokio::test]
async fn update_with_bad_rooms_leaves_store_unchanged() -> anyhow::Result<()> {
    let state = memory_state();
    let owner = auth("agent");
    let created = property_service::create_property(
        &state,
        &owner,
        draft("maison", 100.0, vec![Room::new("salon", 30.0)]),
    )
    .await?
    .data
    .expect("created property");

    let err = property_service::update_property(
        &state,
        &owner,
        created.id,
        UpdatePropertyRequest {
            rooms: Some(vec![Room::new("salon", 30.0), Room::new("chambre", -1.0)]),
            ..UpdatePropertyRequest::default()
        },
    )
    .await
    .expect_err("negative surface");
    assert!(matches!(err, AppError::Validation(_)));

    let stored = state.properties.find_by_id(created.id).await?;
    assert_eq!(stored, Some(created));
    Ok(())
}

#[tokio::test]
async fn update_merges_patch_and_keeps_creation_time() -> anyhow::Result<()> {
    let state = memory_state();
    let owner = auth("agent");
    let created = property_service::create_property(
        &state,
        &owner,
        draft("maison", 100.0, vec![Room::new("salon", 30.0)]),
    )
    .await?
    .data
    .expect("created property");

    let updated = property_service::update_property(
        &state,
        &owner,
        created.id,
        UpdatePropertyRequest {
            status: Some("vendu".into()),
            rooms: Some(vec![Room::new("chambre", 11.0), Room::new("chambre", 9.0)]),
            ..UpdatePropertyRequest::default()
        },
    )
    .await?
    .data
    .expect("updated property");

    assert_eq!(updated.status, "vendu");
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.bedroom_count(), 2);
    assert_eq!(updated.rooms[1].number, Some(2));
    Ok(())
}

#[tokio::test]
async fn non_owner_is_forbidden() -> anyhow::Result<()> {
    let state = memory_state();
    let created = property_service::create_property(
        &state,
        &auth("agent"),
        draft("maison", 100.0, vec![]),
    )
    .await?
    .data
    .expect("created property");

    let stranger = auth("user");
    let err = property_service::update_property(
        &state,
        &stranger,
        created.id,
        UpdatePropertyRequest::default(),
    )
    .await
    .expect_err("not the owner");
    assert!(matches!(err, AppError::Forbidden));

    let err = property_service::delete_property(&state, &stranger, created.id)
        .await
        .expect_err("not the owner");
    assert!(matches!(err, AppError::Forbidden));

    // admins may delete anything
    property_service::delete_property(&state, &auth("admin"), created.id).await?;
    assert!(state.properties.find_by_id(created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn list_paginates_and_filters() -> anyhow::Result<()> {
    let state = memory_state();
    let owner = auth("agent");
    for (property_type, surface) in [("maison", 90.0), ("appartement", 45.0), ("maison", 120.0)] {
        property_service::create_property(&state, &owner, draft(property_type, surface, vec![]))
            .await?;
    }

    let page = property_service::list_properties(
        &state,
        PropertyListQuery {
            page: Some(1),
            per_page: Some(2),
            ..PropertyListQuery::default()
        },
    )
    .await?;
    assert_eq!(page.data.expect("page").items.len(), 2);
    assert_eq!(page.meta.and_then(|m| m.total), Some(3));

    let count = property_service::count_properties(
        &state,
        PropertyListQuery {
            property_type: Some("maison".into()),
            ..PropertyListQuery::default()
        },
    )
    .await?;
    assert_eq!(count.data.expect("count").count, 2);
    Ok(())
}

#[tokio::test]
async fn searches_and_statistics() -> anyhow::Result<()> {
    let state = memory_state();
    let owner = auth("agent");

    let mut family = draft(
        "Villa",
        200.0,
        vec![
            Room::new("chambre", 15.0),
            Room::new("chambre", 11.0),
            Room::new("salon", 40.0),
        ],
    );
    family.characteristics = Some(Characteristics {
        pool: Some(true),
        garden: Some(true),
        ..Characteristics::default()
    });
    let family = property_service::create_property(&state, &owner, family)
        .await?
        .data
        .expect("family villa");
    property_service::create_property(
        &state,
        &owner,
        draft("Villa", 100.0, vec![Room::new("chambre", 9.0)]),
    )
    .await?;

    let rooms = property_service::search_by_rooms(
        &state,
        RoomSearchQuery {
            room_type: "chambre".into(),
            min_count: Some(2),
            min_surface: None,
        },
    )
    .await?
    .data
    .expect("rooms search");
    assert_eq!(rooms.items.len(), 1);
    assert_eq!(rooms.items[0].id, family.id);

    let large = property_service::search_by_rooms(
        &state,
        RoomSearchQuery {
            room_type: "chambre".into(),
            min_count: None,
            min_surface: Some(12.0),
        },
    )
    .await?
    .data
    .expect("large rooms search");
    assert_eq!(large.items.len(), 1);

    let surface = property_service::search_by_surface(
        &state,
        SurfaceSearchQuery {
            min_surface: Some(150.0),
            max_surface: None,
        },
    )
    .await?
    .data
    .expect("surface search");
    assert_eq!(surface.items.len(), 1);

    let flagged = property_service::search_by_characteristics(
        &state,
        CharacteristicsQuery {
            characteristics: "pool, garden".into(),
        },
    )
    .await?
    .data
    .expect("characteristics search");
    assert_eq!(flagged.items.len(), 1);

    let averages = property_service::average_surfaces(&state)
        .await?
        .data
        .expect("averages");
    assert_eq!(averages.averages["Villa"], 150.0);

    let groups = property_service::properties_by_type(&state)
        .await?
        .data
        .expect("groups");
    assert_eq!(groups.groups["Villa"].len(), 2);
    Ok(())
}

#[tokio::test]
async fn inverted_surface_range_is_rejected() {
    let state = memory_state();
    let err = property_service::search_by_surface(
        &state,
        SurfaceSearchQuery {
            min_surface: Some(200.0),
            max_surface: Some(100.0),
        },
    )
    .await
    .expect_err("min above max");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn display_surfaces_of_stored_property() -> anyhow::Result<()> {
    let state = memory_state();
    let created = property_service::create_property(
        &state,
        &auth("agent"),
        draft("maison", 80.0, vec![Room::new("chambre", 12.0), Room::new("chambre", 14.0)]),
    )
    .await?
    .data
    .expect("created property");

    let entries = property_service::surfaces_for_display(&state, created.id)
        .await?
        .data
        .expect("entries");
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Habitable", "Chambre 1", "Chambre 2"]);

    let missing = property_service::surfaces_for_display(&state, uuid::Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn cloned_state_shares_the_store() -> anyhow::Result<()> {
    let state = memory_state();
    let cloned = state.clone();
    let created = property_service::create_property(&cloned, &auth("agent"), draft("maison", 90.0, vec![]))
        .await?
        .data
        .expect("created property");
    assert!(state.properties.find_by_id(created.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn blank_list_filters_are_ignored() -> anyhow::Result<()> {
    let state = memory_state();
    let owner = auth("agent");
    for property_type in ["maison", "appartement"] {
        property_service::create_property(&state, &owner, draft(property_type, 70.0, vec![])).await?;
    }

    let count = property_service::count_properties(
        &state,
        PropertyListQuery {
            property_type: Some(String::new()),
            status: Some("  ".into()),
            ..PropertyListQuery::default()
        },
    )
    .await?;
    assert_eq!(count.data.expect("count").count, 2);
    Ok(())
}

#[tokio::test]
async fn huge_page_number_yields_an_empty_page() -> anyhow::Result<()> {
    let state = memory_state();
    property_service::create_property(&state, &auth("agent"), draft("maison", 70.0, vec![])).await?;

    let page = property_service::list_properties(
        &state,
        PropertyListQuery {
            page: Some(i64::MAX),
            per_page: Some(100),
            ..PropertyListQuery::default()
        },
    )
    .await?;
    assert!(page.data.expect("page").items.is_empty());
    assert_eq!(page.meta.and_then(|m| m.total), Some(1));
    Ok(())
}
