//! Tests for region label composition.

use heatmap_common::{BoundaryDataset, BoundaryFeature, GeoBounds, LabelMode, LatLng, Region, ValueMap};
use renderer::labels::{
    compose_labels, label_anchor, label_for, label_text, tooltip_for, NAME_SEPARATOR,
};
use test_utils::{assert_approx_eq, sample_config, sample_dataset};

// ============================================================================
// label_text / label_for tests
// ============================================================================

#[test]
fn test_english_applies_idlib_override() {
    assert_eq!(label_text(Region::Idleb, LabelMode::English), "Idlib");
    assert_eq!(label_text(Region::Aleppo, LabelMode::English), "Aleppo");
}

#[test]
fn test_arabic_name() {
    assert_eq!(label_text(Region::Aleppo, LabelMode::Arabic), "حلب");
}

#[test]
fn test_both_with_value() {
    let mut values = ValueMap::new();
    values.set(Region::Idleb, 7.0);

    let label = label_for(Region::Idleb, LabelMode::Both, true, &values);
    assert_eq!(label.name, format!("Idlib{}إدلب", NAME_SEPARATOR));
    assert_eq!(label.value.as_deref(), Some("7"));

    let html = label.to_html();
    assert!(html.contains(r#"<span class="gov-value">7</span>"#));
}

#[test]
fn test_name_only_without_value() {
    let mut values = ValueMap::new();
    values.set(Region::Homs, 12.25);
    let label = label_for(Region::Homs, LabelMode::English, false, &values);
    assert_eq!(label.value, None);
    assert_eq!(label.name, "Homs");
    assert!(!label.to_html().contains("gov-value"));
}

#[test]
fn test_tooltip() {
    let mut values = ValueMap::new();
    values.set(Region::Idleb, 7.0);
    assert_eq!(tooltip_for(Region::Idleb, &values), "Idlib: 7");
}

// ============================================================================
// anchor tests
// ============================================================================

#[test]
fn test_damascus_anchor_nudged_north() {
    let centroid = LatLng::new(33.5, 36.3);
    let anchor = label_anchor(Region::Damascus, centroid);
    assert_approx_eq!(anchor.lat, 33.65, 1e-9);
    assert_eq!(anchor.lng, 36.3);
}

#[test]
fn test_other_anchors_unchanged() {
    let centroid = LatLng::new(35.0, 37.0);
    for region in Region::ALL.iter().filter(|r| **r != Region::Damascus) {
        assert_eq!(label_anchor(*region, centroid), centroid);
    }
}

// ============================================================================
// compose_labels tests
// ============================================================================

#[test]
fn test_compose_one_label_per_region() {
    let labels = compose_labels(&sample_dataset(), &sample_config());
    assert_eq!(labels.len(), 14);
    assert!(labels.iter().all(|l| l.label.value.is_none()));
}

#[test]
fn test_compose_nothing_when_names_hidden() {
    let mut config = sample_config();
    config.show_names = false;
    config.show_values = true;
    assert!(compose_labels(&sample_dataset(), &config).is_empty());
}

#[test]
fn test_compose_is_total_rebuild() {
    let dataset = sample_dataset();
    let mut config = sample_config();
    let first = compose_labels(&dataset, &config);

    config.label_mode = LabelMode::Arabic;
    config.show_values = true;
    let second = compose_labels(&dataset, &config);

    assert_eq!(first.len(), second.len());
    assert!(second.iter().all(|l| l.label.value.is_some()));
    assert!(second.iter().all(|l| !l.label.name.contains(NAME_SEPARATOR)));
}

#[test]
fn test_compose_skips_unknown_features() {
    let dataset = BoundaryDataset::new(vec![
        BoundaryFeature {
            key: "Atlantis".to_string(),
            bounds: GeoBounds::from_point(0.0, 0.0),
        },
        BoundaryFeature {
            key: "Damascus".to_string(),
            bounds: GeoBounds {
                min_lng: 36.2,
                min_lat: 33.4,
                max_lng: 36.4,
                max_lat: 33.6,
            },
        },
    ]);
    let labels = compose_labels(&dataset, &sample_config());
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].label.region, Region::Damascus);
    assert_approx_eq!(labels[0].anchor.lat, 33.65, 1e-9);
}
