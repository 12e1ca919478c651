use rust_decimal::Decimal;
use uuid::Uuid;

use super::*;
use crate::filters::{UrlContext, DEFAULT_PRICE_CEILING};

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

fn deal(title: &str, category: &str, price: i64, sale: Option<i64>) -> Deal {
    Deal {
        hash_id: title.to_lowercase().replace(' ', "-"),
        title: Some(title.to_string()),
        category: Some(category.to_string()),
        price: Some(dec(price)),
        sale_price: sale.map(dec),
        ..Deal::default()
    }
}

#[test]
fn default_filters_only_constrain_price() {
    let req = build(&FilterState::default(), 1, DEFAULT_PAGE_SIZE);
    assert_eq!(req.predicates.len(), 1);
    assert_eq!(
        req.predicates[0],
        Predicate::AnyOf(vec![
            Predicate::Range {
                field: Field::SalePrice,
                min: Decimal::ZERO,
                max: DEFAULT_PRICE_CEILING,
            },
            Predicate::Range {
                field: Field::Price,
                min: Decimal::ZERO,
                max: DEFAULT_PRICE_CEILING,
            },
        ])
    );
}

#[test]
fn build_is_deterministic() {
    let mut f = FilterState::default();
    f.toggle_category("Sport");
    f.set_search_term("bike");
    assert_eq!(build(&f, 2, 10), build(&f, 2, 10));
}

#[test]
fn offset_follows_page_window() {
    let f = FilterState::default();
    assert_eq!(build(&f, 1, 10).offset(), 0);
    assert_eq!(build(&f, 3, 10).offset(), 20);
    // page 0 is treated as page 1
    assert_eq!(build(&f, 0, 10).page_index, 1);
}

#[test]
fn price_matches_on_either_sale_or_list_price() {
    let mut f = FilterState::default();
    f.set_price_range(dec(50), dec(100));
    let req = build(&f, 1, 10);

    // list price out of range, sale price in range
    assert!(req.matches(&deal("Jacket", "Fashion", 150, Some(90))));
    // list price in range, no sale price
    assert!(req.matches(&deal("Shirt", "Fashion", 60, None)));
    // bounds are inclusive
    assert!(req.matches(&deal("Belt", "Fashion", 100, None)));
    assert!(req.matches(&deal("Cap", "Fashion", 50, None)));
    // both out of range
    assert!(!req.matches(&deal("Coat", "Fashion", 300, Some(200))));
}

#[test]
fn empty_category_selection_does_not_filter() {
    let req = build(&FilterState::default(), 1, 10);
    assert!(req.matches(&deal("Phone", "Smartphone", 10, None)));
    assert!(req.matches(&deal("Tent", "Travel", 10, None)));
}

#[test]
fn category_selection_is_set_membership() {
    let mut f = FilterState::default();
    f.toggle_category("Sport");
    f.toggle_category("Beauty");
    let req = build(&f, 1, 10);
    assert!(req.predicates.contains(&Predicate::InSet {
        field: Field::Category,
        values: vec!["Beauty".to_string(), "Sport".to_string()],
    }));
    assert!(req.matches(&deal("Ball", "Sport", 10, None)));
    assert!(!req.matches(&deal("Tent", "Travel", 10, None)));
}

#[test]
fn search_is_case_insensitive_over_text_fields() {
    let mut f = FilterState::default();
    f.set_search_term("SHOE");
    let req = build(&f, 1, 10);

    assert!(req.matches(&deal("Running shoes", "Sport", 10, None)));
    assert!(req.matches(&deal("Anything", "Shoes", 10, None)));

    let mut by_description = deal("Trainer", "Sport", 10, None);
    by_description.description = Some("Lightweight shoe for daily runs".to_string());
    assert!(req.matches(&by_description));

    assert!(!req.matches(&deal("Backpack", "Travel", 10, None)));
}

#[test]
fn pinned_category_stacks_with_user_selection() {
    let ctx = UrlContext::from_query("category=Gaming");
    let mut f = FilterState::from_url(&ctx, DEFAULT_PRICE_CEILING);
    f.toggle_category("Fashion");
    f.set_price_range(dec(0), dec(500));
    let req = build(&f, 1, 10);

    assert!(req.predicates.contains(&Predicate::Equals {
        field: Field::Category,
        value: "Gaming".to_string(),
    }));
    assert!(req.predicates.contains(&Predicate::InSet {
        field: Field::Category,
        values: vec!["Fashion".to_string(), "Gaming".to_string()],
    }));

    assert!(req.matches(&deal("Controller", "Gaming", 60, None)));
    assert!(!req.matches(&deal("Scarf", "Fashion", 60, None)));
    // still bound by the user's price window
    assert!(!req.matches(&deal("Console", "Gaming", 900, None)));
}

#[test]
fn pin_survives_user_deselecting_it() {
    let ctx = UrlContext::from_query("category=Gaming");
    let mut f = FilterState::from_url(&ctx, DEFAULT_PRICE_CEILING);
    f.toggle_category("Gaming");
    f.toggle_category("Fashion");
    let req = build(&f, 1, 10);
    assert!(req.matches(&deal("Headset", "Gaming", 60, None)));
    assert!(!req.matches(&deal("Scarf", "Fashion", 60, None)));
}

#[test]
fn pinned_store_matches_by_id_or_name() {
    let id = Uuid::parse_str("6f1c2d3e-4a5b-4c6d-8e7f-90a1b2c3d4e5").unwrap();
    let mut d = deal("Kettle", "Home & Garden", 30, None);
    d.store_id = Some(id);
    d.store_name = Some("Kitchen World".to_string());

    let by_id = build(
        &FilterState::from_url(
            &UrlContext::from_query(&format!("store={id}")),
            DEFAULT_PRICE_CEILING,
        ),
        1,
        10,
    );
    assert!(by_id.matches(&d));

    let by_name = build(
        &FilterState::from_url(
            &UrlContext::from_query("store=kitchen+world"),
            DEFAULT_PRICE_CEILING,
        ),
        1,
        10,
    );
    assert!(by_name.matches(&d));

    d.store_id = Some(Uuid::nil());
    d.store_name = Some("Other".to_string());
    assert!(!by_id.matches(&d));
    assert!(!by_name.matches(&d));
}

#[test]
fn missing_fields_never_match() {
    let mut f = FilterState::default();
    f.set_search_term("lamp");
    let req = build(&f, 1, 10);
    let bare = Deal {
        hash_id: "x".to_string(),
        price: Some(dec(10)),
        ..Deal::default()
    };
    assert!(!req.matches(&bare));
}
