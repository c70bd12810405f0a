//! Tests for bottleneck analysis and derived requirements.

use postkeeper_core::{
    Category, DailyRequirements, DayEntry, DayPlan, InventorySnapshot, Recipe, Requirement,
    RequirementRole, Slot, compute_bottleneck,
};

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

fn four_videos() -> Recipe {
    Recipe::new("four-videos")
        .with_slot(Slot::new("video-auto").with_fallback("video-meme"))
        .with_slot(Slot::new("video-meme"))
        .with_slot(Slot::new("video-ero").with_fallback("video-meme"))
        .with_slot(Slot::new("video-auto").with_fallback("video-meme"))
        .with_auxiliary("anecdotes", 1)
}

fn day() -> DayPlan {
    DayPlan::new(vec![
        DayEntry::new("ten-pics", 3),
        DayEntry::new("four-videos", 1),
    ])
}

fn cat(name: &str) -> Category {
    Category::new(name)
}

#[test]
fn test_smallest_primary_ratio_is_bottleneck() {
    let snapshot = InventorySnapshot::from_pairs([
        ("ero-real", 18),
        ("ero-anime", 6),
        ("standart-meme", 30),
        ("anecdotes", 4),
    ]);
    let requirements = DailyRequirements::new()
        .with("ero-real", Requirement::primary(9))
        .with("ero-anime", Requirement::primary(6))
        .with("standart-meme", Requirement::primary(9))
        .with("anecdotes", Requirement::primary(4));

    let report = compute_bottleneck(&snapshot, &requirements);
    let limit = report.bottleneck().expect("Primary categories are present");

    // ero-anime and anecdotes tie at 1.0; the first in category order wins.
    assert!(limit.category() == &cat("ero-anime") || limit.category() == &cat("anecdotes"));
    assert_eq!(limit.category(), &cat("anecdotes"));
    assert_eq!(report.days_remaining(), 1);
    assert_eq!(report.primary().len(), 4);
    assert_eq!(report.primary()[0].ratio(), &1.0);
    assert_eq!(report.primary()[3].category(), &cat("standart-meme"));
}

#[test]
fn test_replaceable_categories_never_limit() {
    let snapshot = InventorySnapshot::from_pairs([
        ("ero-real", 18),
        ("standart-art", 0),
        ("standart-meme", 30),
    ]);
    let requirements = DailyRequirements::new()
        .with("ero-real", Requirement::primary(9))
        .with("standart-meme", Requirement::primary(9))
        .with("standart-art", Requirement::replaceable(3));

    let report = compute_bottleneck(&snapshot, &requirements);

    assert_eq!(report.bottleneck().map(|r| r.category()), Some(&cat("ero-real")));
    assert_eq!(report.days_remaining(), 2);
    assert_eq!(report.replaceable().len(), 1);
    assert_eq!(report.replaceable()[0].days(), 0);
}

#[test]
fn test_zero_requirement_is_omitted() {
    let snapshot = InventorySnapshot::from_pairs([("ero-real", 5), ("anecdotes", 0)]);
    let requirements = DailyRequirements::new()
        .with("ero-real", Requirement::primary(2))
        .with("anecdotes", Requirement::primary(0));

    let report = compute_bottleneck(&snapshot, &requirements);

    assert_eq!(report.primary().len(), 1);
    assert_eq!(report.days_remaining(), 2);
    assert!(report.primary().iter().all(|r| r.ratio().is_finite()));
}

#[test]
fn test_empty_requirements_have_no_bottleneck() {
    let report = compute_bottleneck(&InventorySnapshot::new(), &DailyRequirements::new());
    assert!(report.bottleneck().is_none());
    assert_eq!(report.days_remaining(), 0);
}

#[test]
fn test_requirements_derived_from_day_plan() {
    let recipes = vec![ten_pics(), four_videos()];

    let requirements = day()
        .requirements(&recipes)
        .expect("Day plan names known recipes");

    let expect = [
        ("ero-real", 9, RequirementRole::Primary),
        ("ero-anime", 6, RequirementRole::Primary),
        ("standart-meme", 9, RequirementRole::Primary),
        ("anecdotes", 4, RequirementRole::Primary),
        ("video-meme", 1, RequirementRole::Primary),
        ("standart-art", 3, RequirementRole::Replaceable),
        ("single-meme", 3, RequirementRole::Replaceable),
        ("video-auto", 2, RequirementRole::Replaceable),
        ("video-ero", 1, RequirementRole::Replaceable),
    ];
    assert_eq!(requirements.len(), expect.len());
    for (name, daily, role) in expect {
        let req = requirements
            .get(&cat(name))
            .unwrap_or_else(|| panic!("missing requirement for {name}"));
        assert_eq!(*req.daily(), daily, "daily for {name}");
        assert_eq!(*req.role(), role, "role for {name}");
    }
}

#[test]
fn test_effective_requirements_absorb_shortfall() {
    let recipes = vec![ten_pics(), four_videos()];
    let snapshot = InventorySnapshot::from_pairs([
        ("standart-art", 1),
        ("single-meme", 0),
        ("video-auto", 1),
        ("video-ero", 0),
    ]);

    let requirements = day()
        .effective_requirements(&recipes, &snapshot)
        .expect("Day plan names known recipes");

    // Two art slots and three single-meme slots fall through to memes.
    assert_eq!(requirements.get(&cat("standart-meme")).map(|r| *r.daily()), Some(14));
    // One auto slot and the ero slot fall through to video-meme.
    assert_eq!(requirements.get(&cat("video-meme")).map(|r| *r.daily()), Some(3));
    assert_eq!(
        requirements.get(&cat("standart-art")).map(|r| *r.role()),
        Some(RequirementRole::Replaceable)
    );
}

#[test]
fn test_unknown_day_recipe_is_config_error() {
    let plan = DayPlan::new(vec![DayEntry::new("missing", 1)]);
    let err = plan.requirements(&[ten_pics()]).expect_err("Recipe is unknown");
    assert!(err.message.contains("missing"));
}
