//! Tests for recipe evaluation and fallback substitution.

use postkeeper_core::{Category, Infeasible, InventorySnapshot, Recipe, Slot, evaluate};
use postkeeper_error::ShortageErrorKind;

fn ten_pics() -> Recipe {
    Recipe::new("ten-pics")
        .with_slot(Slot::new("ero-real"))
        .with_slot(Slot::new("standart-art").with_fallback("standart-meme"))
        .with_slot(Slot::new("ero-anime"))
        .with_slot(Slot::new("single-meme").with_fallback("standart-meme"))
        .with_slot(Slot::new("ero-real"))
        .with_slot(Slot::new("standart-meme"))
        .with_slot(Slot::new("ero-anime"))
        .with_slot(Slot::new("standart-meme"))
        .with_slot(Slot::new("ero-real"))
        .with_slot(Slot::new("standart-meme"))
        .with_auxiliary("anecdotes", 1)
}

fn cat(name: &str) -> Category {
    Category::new(name)
}

#[test]
fn test_primaries_used_when_available() {
    let snapshot = InventorySnapshot::from_pairs([
        ("ero-real", 10),
        ("standart-art", 5),
        ("ero-anime", 10),
        ("single-meme", 5),
        ("standart-meme", 10),
        ("anecdotes", 5),
    ]);

    let plan = evaluate(&ten_pics(), &snapshot).expect("Recipe should be feasible");

    assert_eq!(plan.slots().len(), 10);
    assert!(plan.slots().iter().all(|s| !s.substituted()));
    assert_eq!(plan.deduction(&cat("ero-real")), 3);
    assert_eq!(plan.deduction(&cat("ero-anime")), 2);
    assert_eq!(plan.deduction(&cat("standart-art")), 1);
    assert_eq!(plan.deduction(&cat("single-meme")), 1);
    assert_eq!(plan.deduction(&cat("standart-meme")), 3);
    assert_eq!(plan.deduction(&cat("anecdotes")), 1);
}

#[test]
fn test_fallbacks_absorb_exhausted_primaries() {
    let snapshot = InventorySnapshot::from_pairs([
        ("ero-real", 3),
        ("standart-art", 0),
        ("ero-anime", 2),
        ("single-meme", 0),
        ("standart-meme", 5),
        ("anecdotes", 1),
    ]);

    let plan = evaluate(&ten_pics(), &snapshot).expect("Fallbacks cover the slots");

    assert_eq!(plan.deduction(&cat("standart-meme")), 5);
    assert_eq!(plan.deduction(&cat("standart-art")), 0);
    let second = &plan.slots()[1];
    assert_eq!(second.category(), &cat("standart-meme"));
    assert!(*second.substituted());
}

#[test]
fn test_shared_fallback_competes_with_direct_slots() {
    // The fallback in slot 0 takes the only meme, so slot 1 starves.
    let recipe = Recipe::new("shared")
        .with_slot(Slot::new("art").with_fallback("meme"))
        .with_slot(Slot::new("meme"));
    let snapshot = InventorySnapshot::from_pairs([("art", 0), ("meme", 1)]);

    let err = evaluate(&recipe, &snapshot).expect_err("Only one meme for two slots");

    assert_eq!(
        err,
        Infeasible::SlotUnresolved {
            slot_index: 1,
            chain: vec![cat("meme")],
        }
    );
}

#[test]
fn test_standart_meme_short_by_one() {
    let snapshot = InventorySnapshot::from_pairs([
        ("ero-real", 3),
        ("ero-anime", 2),
        ("standart-meme", 4),
        ("anecdotes", 1),
    ]);

    let err = evaluate(&ten_pics(), &snapshot).expect_err("Five memes needed");
    assert!(matches!(err, Infeasible::SlotUnresolved { slot_index: 9, .. }));
    assert_eq!(err.category(), Some(&cat("standart-meme")));
}

#[test]
fn test_auxiliary_checked_after_slots() {
    let snapshot = InventorySnapshot::from_pairs([
        ("ero-real", 3),
        ("ero-anime", 2),
        ("standart-meme", 5),
        ("anecdotes", 0),
    ]);

    let err = evaluate(&ten_pics(), &snapshot).expect_err("No anecdotes");
    assert_eq!(
        err,
        Infeasible::AuxiliaryExhausted {
            category: cat("anecdotes"),
            required: 1,
            available: 0,
        }
    );
    assert!(err.to_string().contains("auxiliary exhausted"));
}

#[test]
fn test_zero_slot_recipe_depends_only_on_auxiliary() {
    let recipe = Recipe::new("joke-only").with_auxiliary("anecdotes", 1);

    let empty = InventorySnapshot::new();
    assert!(evaluate(&recipe, &empty).is_err());

    let one = InventorySnapshot::from_pairs([("anecdotes", 1)]);
    let plan = evaluate(&recipe, &one).expect("One anecdote suffices");
    assert!(plan.slots().is_empty());
    assert_eq!(plan.deduction(&cat("anecdotes")), 1);
}

#[test]
fn test_slot_quantity_above_one() {
    let recipe = Recipe::new("pairs").with_slot(
        Slot::new("art")
            .with_fallback("meme")
            .with_quantity(2),
    );

    let snapshot = InventorySnapshot::from_pairs([("art", 1), ("meme", 2)]);
    let plan = evaluate(&recipe, &snapshot).expect("Fallback holds two");
    assert_eq!(plan.slots()[0].category(), &cat("meme"));
    assert_eq!(*plan.slots()[0].quantity(), 2);
    assert_eq!(plan.deduction(&cat("art")), 0);
}

#[test]
fn test_never_deducts_more_than_available() {
    let recipe = ten_pics();
    let snapshots = [
        InventorySnapshot::from_pairs([
            ("ero-real", 3),
            ("ero-anime", 2),
            ("standart-meme", 5),
            ("anecdotes", 1),
        ]),
        InventorySnapshot::from_pairs([
            ("ero-real", 4),
            ("standart-art", 1),
            ("ero-anime", 2),
            ("standart-meme", 4),
            ("anecdotes", 9),
        ]),
        InventorySnapshot::from_pairs([
            ("ero-real", 3),
            ("standart-art", 2),
            ("ero-anime", 3),
            ("single-meme", 1),
            ("standart-meme", 3),
            ("anecdotes", 1),
        ]),
    ];

    for snapshot in &snapshots {
        let plan = evaluate(&recipe, snapshot).expect("All fixtures are feasible");
        for (category, amount) in plan.deductions() {
            assert!(
                *amount <= snapshot.count(category),
                "{category} over-deducted: {amount} > {}",
                snapshot.count(category)
            );
        }
    }
}

#[test]
fn test_evaluation_is_idempotent_and_pure() {
    let snapshot = InventorySnapshot::from_pairs([
        ("ero-real", 3),
        ("standart-art", 1),
        ("ero-anime", 2),
        ("standart-meme", 4),
        ("anecdotes", 1),
    ]);
    let before = snapshot.clone();

    let first = evaluate(&ten_pics(), &snapshot);
    let second = evaluate(&ten_pics(), &snapshot);

    assert_eq!(first, second);
    assert_eq!(snapshot, before);
}

#[test]
fn test_infeasible_converts_to_shortage() {
    let err = Infeasible::SlotUnresolved {
        slot_index: 1,
        chain: vec![cat("standart-art"), cat("standart-meme")],
    };

    let shortage = err.into_shortage("ten-pics");

    assert_eq!(shortage.kind.category(), "standart-art");
    match &shortage.kind {
        ShortageErrorKind::Slot { chain, recipe, .. } => {
            assert_eq!(chain, "standart-art/standart-meme");
            assert_eq!(recipe, "ten-pics");
        }
        other => panic!("Expected slot shortage, got {other:?}"),
    }
}
