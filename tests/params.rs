use immo_api::routes::params::{MAX_PAGE, Pagination, split_csv};

#[test]
fn pagination_defaults_and_bounds() {
    assert_eq!(Pagination::default().normalize(), (1, 20, 0));
    let p = Pagination {
        page: Some(0),
        per_page: Some(1000),
    };
    assert_eq!(p.normalize(), (1, 100, 0));
    let p = Pagination {
        page: Some(3),
        per_page: Some(10),
    };
    assert_eq!(p.normalize(), (3, 10, 20));
}

#[test]
fn pagination_does_not_overflow_on_huge_pages() {
    let p = Pagination {
        page: Some(i64::MAX),
        per_page: Some(100),
    };
    let (page, per_page, offset) = p.normalize();
    assert_eq!(page, MAX_PAGE);
    assert_eq!(per_page, 100);
    assert!(offset > 0);
}

#[test]
fn csv_values_are_trimmed() {
    assert_eq!(split_csv(" garden, ,pool "), vec!["garden", "pool"]);
    assert!(split_csv("").is_empty());
}
