//! Tests for the personalization resolver
//!
//! These tests verify:
//! - The size / engraving scenario end to end
//! - Cascading clears through several levels
//! - Direct-parent vs ancestor-chain visibility
//! - Order payload lines

use storefront_resolver::{
    format_product_price, is_visible, load_options, price_for, validate, FieldType,
    PersonalizationOption, PriceConfig, PriceType, Product, Resolver, ResolverSettings,
    SelectChoice, SelectionState, ValidationErrors, Variant, VisibilityMode,
};

const EXPORT: &str = r#"[
    {
        "id": "size",
        "label": "Size",
        "fieldType": "select",
        "displayOrder": 1,
        "options": [
            {"value": "S", "label": "Small", "additionalPrice": 0},
            {"value": "L", "label": "Large", "additionalPrice": 500}
        ]
    },
    {
        "id": "engrave",
        "label": "Engrave",
        "fieldType": "text",
        "parentOptionId": "size",
        "showWhenParentValue": "L",
        "required": true,
        "characterLimit": 10,
        "displayOrder": 2
    },
    {
        "id": "retired",
        "label": "Retired",
        "fieldType": "text",
        "active": false
    }
]"#;

fn scenario() -> Resolver {
    Resolver::new(load_options(EXPORT).unwrap(), ResolverSettings::default())
}

fn sel(pairs: &[(&str, &str)]) -> SelectionState {
    let mut state = SelectionState::new();
    for (id, value) in pairs {
        state.set(id, value);
    }
    state
}

// =============================================================================
// Size / engraving scenario
// =============================================================================

#[test]
fn test_inactive_option_excluded() {
    let resolver = scenario();
    assert_eq!(resolver.tree().len(), 2);
    assert!(resolver.tree().get("retired").is_none());
}

#[test]
fn test_small_hides_engraving() {
    let resolver = scenario();
    let selections = sel(&[("size", "S")]);

    assert!(!resolver.is_visible("engrave", &selections));
    let resolution = resolver.resolve(&selections);
    assert!(!resolution.visible["engrave"]);
    assert!(resolution.errors.get("engrave").is_none());
    assert!(!resolution.prices.contains_key("engrave"));
    assert_eq!(resolution.total, 0);
}

#[test]
fn test_large_requires_engraving() {
    let resolver = scenario();
    let selections = sel(&[("size", "L")]);

    assert!(resolver.is_visible("engrave", &selections));
    let engrave = resolver.tree().get("engrave").unwrap();
    assert_eq!(validate(engrave, ""), Some("Engrave is required".to_string()));

    let size = resolver.tree().get("size").unwrap();
    assert_eq!(price_for(size, "L"), 500);
    assert_eq!(resolver.resolve(&selections).total, 500);
}

#[test]
fn test_switching_back_clears_engraving() {
    let resolver = scenario();
    let errors = ValidationErrors::new();

    let step = resolver.on_change(&SelectionState::new(), &errors, "size", "L");
    let step = resolver.on_change(&step.selections, &step.errors, "engrave", "Ann");
    assert!(step.errors.is_empty());
    assert_eq!(resolver.line_items(&step.selections).len(), 2);

    let step = resolver.on_change(&step.selections, &step.errors, "size", "S");
    assert_eq!(step.cleared, vec!["engrave".to_string()]);
    assert_eq!(step.selections.get("engrave"), "");
    assert_eq!(resolver.resolve(&step.selections).total, 0);
}

#[test]
fn test_repeated_change_is_idempotent() {
    let resolver = scenario();
    let start = sel(&[("size", "L"), ("engrave", "Ann")]);

    let first = resolver.on_change(&start, &ValidationErrors::new(), "size", "S");
    assert_eq!(first.cleared.len(), 1);

    let second = resolver.on_change(&first.selections, &first.errors, "size", "S");
    assert!(second.cleared.is_empty());
    assert_eq!(second.selections, first.selections);
    assert_eq!(second.errors, first.errors);
}

// =============================================================================
// Multi-level trees
// =============================================================================

fn deep_tree(mode: VisibilityMode) -> Resolver {
    let settings = ResolverSettings {
        visibility_mode: mode,
        ..ResolverSettings::default()
    };
    Resolver::new(
        vec![
            PersonalizationOption::new("kit", "Kit", FieldType::Select).with_choices(vec![
                SelectChoice::new("basic", "Basic", 0),
                SelectChoice::new("gift", "Gift", 1500),
            ]),
            PersonalizationOption::new("wrap", "Wrap", FieldType::Select)
                .with_parent("kit", "gift")
                .with_choices(vec![
                    SelectChoice::new("paper", "Paper", 300),
                    SelectChoice::new("box", "Box", 700),
                ]),
            PersonalizationOption::new("message", "Gift message", FieldType::Textarea)
                .with_parent("wrap", "paper,box")
                .with_flat_price(200)
                .with_character_limit(40),
            PersonalizationOption::new("ribbon", "Ribbon colour", FieldType::Color)
                .with_parent("wrap", "box"),
        ],
        settings,
    )
}

#[test]
fn test_cascade_clears_grandchildren() {
    let resolver = deep_tree(VisibilityMode::DirectParent);
    let selections = sel(&[
        ("kit", "gift"),
        ("wrap", "box"),
        ("message", "Happy birthday"),
        ("ribbon", "#ff0000"),
    ]);
    assert_eq!(resolver.resolve(&selections).total, 1500 + 700 + 200);

    let outcome = resolver.on_change(&selections, &ValidationErrors::new(), "kit", "basic");
    assert_eq!(
        outcome.cleared,
        vec!["wrap".to_string(), "message".to_string(), "ribbon".to_string()]
    );
    assert_eq!(outcome.selections.len(), 1);
}

#[test]
fn test_cascade_only_clears_hidden_children() {
    let resolver = deep_tree(VisibilityMode::DirectParent);
    let selections = sel(&[("kit", "gift"), ("wrap", "box"), ("message", "Hi"), ("ribbon", "#00ff00")]);

    let outcome = resolver.on_change(&selections, &ValidationErrors::new(), "wrap", "paper");
    assert_eq!(outcome.cleared, vec!["ribbon".to_string()]);
    assert_eq!(outcome.selections.get("message"), "Hi");
}

#[test]
fn test_direct_parent_mode_keeps_stale_grandchild_visible() {
    let direct = deep_tree(VisibilityMode::DirectParent);
    let chain = deep_tree(VisibilityMode::AncestorChain);
    // wrap holds a stale value while kit is basic
    let selections = sel(&[("kit", "basic"), ("wrap", "box")]);

    let message = direct.tree().get("message").unwrap();
    assert!(is_visible(direct.tree(), message, &selections, VisibilityMode::DirectParent));
    assert!(!is_visible(chain.tree(), message, &selections, VisibilityMode::AncestorChain));

    assert!(direct.is_visible("message", &selections));
    assert!(!chain.is_visible("message", &selections));
}

#[test]
fn test_text_parent_does_not_cascade() {
    let resolver = Resolver::new(
        vec![
            PersonalizationOption::new("initials", "Initials", FieldType::Text),
            PersonalizationOption::new("font", "Font", FieldType::Text).with_parent("initials", "AB"),
        ],
        ResolverSettings::default(),
    );
    let selections = sel(&[("initials", "AB"), ("font", "serif")]);
    let outcome = resolver.on_change(&selections, &ValidationErrors::new(), "initials", "CD");
    assert!(outcome.cleared.is_empty());
    assert_eq!(outcome.selections.get("font"), "serif");
    // Hidden, so it neither prices nor ships
    assert!(resolver.line_items(&outcome.selections).iter().all(|l| l.option_id != "font"));
}

#[test]
fn test_line_items_tree_order_and_labels() {
    let resolver = deep_tree(VisibilityMode::DirectParent);
    let selections = sel(&[("ribbon", "#123456"), ("kit", "gift"), ("wrap", "box"), ("message", "Hi")]);

    let lines = resolver.line_items(&selections);
    let ids: Vec<&str> = lines.iter().map(|l| l.option_id.as_str()).collect();
    assert_eq!(ids, vec!["kit", "wrap", "message", "ribbon"]);
    assert_eq!(lines[0].display_value, "Gift");
    assert_eq!(lines[1].display_value, "Box");
    assert_eq!(lines[2].additional_price, 200);
    assert_eq!(lines[3].additional_price, 0);
}

#[test]
fn test_change_outcome_serializes_for_ui() {
    let resolver = scenario();
    let outcome = resolver.on_change(&SelectionState::new(), &ValidationErrors::new(), "size", "L");
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["selections"]["size"], "L");
    assert!(json["cleared"].as_array().unwrap().is_empty());
}

// =============================================================================
// Product price display
// =============================================================================

#[test]
fn test_auto_price_with_two_variants() {
    let product = Product {
        enable_variants: true,
        variants: vec![Variant::priced(1000), Variant::priced(1500)],
        ..Product::default()
    };
    let display = format_product_price(&product, &PriceConfig::of_type(PriceType::Auto));
    assert_eq!(display.display, "from $10");
    assert!(display.should_show);
    assert!(!display.is_custom);
}

#[test]
fn test_hidden_price_never_shown() {
    let product = Product {
        price: Some(5000),
        ..Product::default()
    };
    let display = format_product_price(&product, &PriceConfig::of_type(PriceType::Hidden));
    assert!(!display.should_show);
}
