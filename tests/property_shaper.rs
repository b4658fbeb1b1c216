mod common;

use immo_api::{
    models::{Characteristics, PropertyDraft, Room, SurfaceKind, Surfaces},
    services::property_shaper::{
        auto_number_rooms, average_surface_by_type, count_rooms_of_type, filter_characteristics,
        filter_large_rooms, filter_min_rooms, filter_surface_range, group_by_type, prepare,
        room_display_name, rooms_of_type_ordered, surface_of_type, surfaces_for_display,
    },
};

use common::{draft, property};

fn numbers(rooms: &[Room]) -> Vec<(String, Option<u32>)> {
    rooms
        .iter()
        .map(|r| (r.room_type.clone(), r.number))
        .collect()
}

#[test]
fn auto_numbering_counts_each_type_independently() {
    let mut rooms = vec![
        Room::new("chambre", 12.0),
        Room::new("cuisine", 8.0),
        Room::new("chambre", 10.0),
        Room::new("wc", 1.5),
        Room::new("chambre", 9.0),
        Room::new("wc", 1.2),
    ];
    auto_number_rooms(&mut rooms);

    assert_eq!(
        numbers(&rooms),
        vec![
            ("chambre".to_string(), Some(1)),
            ("cuisine".to_string(), Some(1)),
            ("chambre".to_string(), Some(2)),
            ("wc".to_string(), Some(1)),
            ("chambre".to_string(), Some(3)),
            ("wc".to_string(), Some(2)),
        ]
    );
    // relative order within a type is preserved
    let surfaces: Vec<f64> = rooms
        .iter()
        .filter(|r| r.room_type == "chambre")
        .map(|r| r.surface)
        .collect();
    assert_eq!(surfaces, vec![12.0, 10.0, 9.0]);
}

#[test]
fn auto_numbering_leaves_fully_numbered_lists_alone() {
    let original = vec![
        Room::new("chambre", 12.0).numbered(7),
        Room::new("chambre", 10.0).numbered(3),
        Room::new("salon", 20.0).numbered(1),
    ];
    let mut rooms = original.clone();
    auto_number_rooms(&mut rooms);
    assert_eq!(rooms, original);
}

#[test]
fn manual_numbers_are_not_compacted_on_collision() {
    let mut rooms = vec![
        Room::new("chambre", 12.0).numbered(2),
        Room::new("chambre", 10.0),
    ];
    auto_number_rooms(&mut rooms);
    // the second bedroom takes its position, duplicating the manual 2
    assert_eq!(rooms[0].number, Some(2));
    assert_eq!(rooms[1].number, Some(2));
}

#[test]
fn prepare_numbers_rooms_of_a_valid_draft() {
    let validated = prepare(draft(
        "appartement",
        70.0,
        vec![Room::new("chambre", 12.0), Room::new("chambre", 10.0)],
    ))
    .expect("valid draft");

    assert_eq!(validated.rooms[0].number, Some(1));
    assert_eq!(validated.rooms[1].number, Some(2));
}

#[test]
fn prepare_names_every_missing_record() {
    let draft = PropertyDraft {
        property_type: "maison".into(),
        status: "disponible".into(),
        ..PropertyDraft::default()
    };
    let errors = prepare(draft).expect_err("records missing");
    let violations = errors.violations();

    for field in ["location", "surfaces", "price", "description"] {
        assert!(
            violations.iter().any(|v| v == &format!("{field} is required")),
            "expected {field} in {violations:?}"
        );
    }
}

#[test]
fn prepare_reports_room_position_for_bad_surface() {
    let errors = prepare(draft(
        "appartement",
        70.0,
        vec![
            Room::new("chambre", 12.0),
            Room::new("salon", 0.0),
            Room::new("cuisine", -3.0),
        ],
    ))
    .expect_err("non-positive surfaces");

    assert_eq!(
        errors.violations(),
        &[
            "room 2: surface must be positive".to_string(),
            "room 3: surface must be positive".to_string(),
        ]
    );
}

#[test]
fn prepare_aggregates_location_and_price_violations() {
    let mut bad = draft("maison", 90.0, vec![Room::new("", 10.0)]);
    if let Some(location) = bad.location.as_mut() {
        location.city = Some("  ".into());
        location.number = None;
    }
    if let Some(price) = bad.price.as_mut() {
        price.base_price = 0.0;
    }

    let errors = prepare(bad).expect_err("several violations");
    let message = errors.to_string();
    assert!(message.contains("room 1: type is required"));
    assert!(message.contains("location.number is required"));
    assert!(message.contains("location.city is required"));
    assert!(message.contains("price.base_price must be positive"));
}

#[test]
fn soft_checks_do_not_block() {
    let mut soft = draft("maison", 90.0, vec![Room::new("chambre", 10.0)]);
    soft.total_rooms = Some(4);
    if let Some(price) = soft.price.as_mut() {
        price.fee_percentage = Some(5.0);
        price.fee_amount = Some(1.0);
    }
    assert!(prepare(soft).is_ok());
}

#[test]
fn room_queries() {
    let rooms = vec![
        Room::new("chambre", 12.0).numbered(2),
        Room::new("salon", 20.0),
        Room::new("chambre", 9.5),
        Room::new("chambre", 10.0).numbered(1),
    ];

    assert_eq!(count_rooms_of_type(&rooms, "chambre"), 3);
    assert_eq!(count_rooms_of_type(&rooms, "bureau"), 0);
    assert_eq!(surface_of_type(&rooms, "chambre"), 31.5);
    assert_eq!(surface_of_type(&rooms, "bureau"), 0.0);

    let ordered: Vec<Option<u32>> = rooms_of_type_ordered(&rooms, "chambre")
        .iter()
        .map(|r| r.number)
        .collect();
    assert_eq!(ordered, vec![None, Some(1), Some(2)]);
}

#[test]
fn display_names() {
    assert_eq!(room_display_name(&Room::new("chambre", 10.0).numbered(2)), "Chambre 2");
    assert_eq!(room_display_name(&Room::new("salleDEau", 4.0)), "Salle d'eau");
    assert_eq!(room_display_name(&Room::new("veranda", 15.0).numbered(1)), "veranda 1");

    let mut named = Room::new("chambre", 14.0).numbered(1);
    named.name = Some("Suite parentale".into());
    assert_eq!(room_display_name(&named), "Suite parentale 1");
}

#[test]
fn surfaces_for_display_lists_main_surfaces_then_rooms() {
    let surfaces = Surfaces {
        habitable: 80.0,
        terrain: Some(200.0),
        ..Surfaces::default()
    };
    let rooms = vec![Room::new("chambre", 12.0), Room::new("chambre", 14.0)];

    let entries: Vec<(String, f64, SurfaceKind)> = surfaces_for_display(&surfaces, &rooms)
        .into_iter()
        .map(|e| (e.label, e.surface, e.kind))
        .collect();

    assert_eq!(
        entries,
        vec![
            ("Habitable".to_string(), 80.0, SurfaceKind::Principale),
            ("Terrain".to_string(), 200.0, SurfaceKind::Principale),
            ("Chambre 1".to_string(), 12.0, SurfaceKind::Piece),
            ("Chambre 2".to_string(), 14.0, SurfaceKind::Piece),
        ]
    );
}

#[test]
fn surfaces_for_display_follows_category_order() {
    let mut p = property(
        "maison",
        120.0,
        vec![
            Room::new("garage", 18.0),
            Room::new("cuisine", 10.0),
            Room::new("veranda", 12.0),
            Room::new("sejour", 30.0),
        ],
    );
    p.surfaces.carrez = Some(118.0);

    let labels: Vec<String> = p
        .surfaces_for_display()
        .into_iter()
        .map(|e| e.label)
        .collect();
    assert_eq!(
        labels,
        vec!["Habitable", "Carrez", "Séjour 1", "Cuisine 1", "Garage 1"]
    );
}

#[test]
fn min_rooms_filter() {
    let two = property(
        "appartement",
        60.0,
        vec![Room::new("chambre", 10.0), Room::new("chambre", 11.0)],
    );
    let one = property("appartement", 40.0, vec![Room::new("chambre", 10.0)]);
    let two_id = two.id;

    let found = filter_min_rooms(vec![two, one], "chambre", 2);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, two_id);
}

#[test]
fn large_rooms_filter() {
    let big = property("maison", 100.0, vec![Room::new("salon", 35.0)]);
    let small = property("maison", 100.0, vec![Room::new("salon", 18.0)]);
    let big_id = big.id;

    let found = filter_large_rooms(vec![big, small], "salon", 30.0);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, big_id);
}

#[test]
fn surface_range_is_inclusive() {
    let props = vec![
        property("maison", 49.0, vec![]),
        property("maison", 50.0, vec![]),
        property("maison", 100.0, vec![]),
        property("maison", 150.0, vec![]),
        property("maison", 151.0, vec![]),
    ];

    let mut found: Vec<f64> = filter_surface_range(props, 50.0, 150.0)
        .iter()
        .map(|p| p.surfaces.habitable)
        .collect();
    found.sort_by(f64::total_cmp);
    assert_eq!(found, vec![50.0, 100.0, 150.0]);
}

#[test]
fn characteristics_filter_requires_every_flag() {
    let mut both = property("maison", 100.0, vec![]);
    both.characteristics = Some(Characteristics {
        garden: Some(true),
        pool: Some(true),
        ..Characteristics::default()
    });
    let mut garden_only = property("maison", 100.0, vec![]);
    garden_only.characteristics = Some(Characteristics {
        garden: Some(true),
        pool: Some(false),
        ..Characteristics::default()
    });
    let bare = property("maison", 100.0, vec![]);
    let both_id = both.id;

    let found = filter_characteristics(vec![both, garden_only, bare], &["garden", "pool"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, both_id);

    let mut flagged = property("maison", 100.0, vec![]);
    flagged.characteristics = Some(Characteristics {
        garden: Some(true),
        ..Characteristics::default()
    });
    let unknown = filter_characteristics(vec![flagged], &["garden", "sauna"]);
    assert!(unknown.is_empty());
}

#[test]
fn grouping_and_averages() {
    let props = vec![
        property("Villa", 100.0, vec![]),
        property("Villa", 200.0, vec![]),
        property("Studio", 25.0, vec![]),
    ];

    let groups = group_by_type(props.clone());
    assert_eq!(groups["Villa"].len(), 2);
    assert_eq!(groups["Studio"].len(), 1);

    let averages = average_surface_by_type(props);
    assert_eq!(averages["Villa"], 150.0);
    assert_eq!(averages["Studio"], 25.0);
}

#[test]
fn empty_surfaces_record_is_rejected() {
    let draft: PropertyDraft = serde_json::from_value(serde_json::json!({
        "property_type": "maison",
        "status": "disponible",
        "description": { "title": "Maison", "body": "Au calme" },
        "location": { "number": "3", "street": "rue des Lilas", "postal_code": "69003", "city": "Lyon" },
        "surfaces": {},
        "price": { "base_price": 250000.0 }
    }))
    .expect("draft json");

    let errors = prepare(draft).expect_err("habitable missing");
    assert_eq!(
        errors.violations(),
        &["surfaces.habitable must be positive".to_string()]
    );
}
