//! Tests for the shareable link codec.

use heatmap_common::{ExportPreset, LabelMode, Palette, Region, ViewConfig};
use view_state::{decode, encode, share_link, PartialViewConfig};
use test_utils::{ramp_values, sample_config};

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_sample_config_round_trip() {
    let config = sample_config();
    let decoded = decode(&encode(&config));

    assert_eq!(decoded.palette, Some(Palette::Blue));
    assert_eq!(decoded.label_mode, Some(LabelMode::Both));
    assert_eq!(decoded.to_config(), config);
}

#[test]
fn test_round_trip_preserves_awkward_numbers() {
    let mut config = ViewConfig::default();
    config.values.set(Region::Aleppo, 0.1 + 0.2);
    config.values.set(Region::Homs, -1.5e-7);
    config.values.set(Region::AlHasakeh, 1.0e21);
    config.values.set(Region::Hama, f64::MAX);
    config.show_values = true;
    config.export_preset = ExportPreset::MapLegendMeta;

    assert_eq!(decode(&encode(&config)).to_config(), config);
}

#[test]
fn test_round_trip_every_palette_and_mode() {
    for palette in Palette::ALL {
        for label_mode in [LabelMode::English, LabelMode::Arabic, LabelMode::Both] {
            let config = ViewConfig {
                palette,
                label_mode,
                values: ramp_values(),
                ..ViewConfig::default()
            };
            assert_eq!(decode(&encode(&config)).to_config(), config);
        }
    }
}

// ============================================================================
// Tolerant decoding
// ============================================================================

#[test]
fn test_invalid_palette_leaves_current_unchanged() {
    let mut config = sample_config();
    let partial = decode("palette=teal&showValues=1");
    partial.apply_to(&mut config);

    assert_eq!(config.palette, Palette::Blue);
    assert!(config.show_values);
}

#[test]
fn test_invalid_flags_and_tokens_are_skipped() {
    let partial = decode("showNames=yes&labelMode=fr&exportPreset=poster&showValues=2");
    assert_eq!(partial, PartialViewConfig::default());
}

#[test]
fn test_long_label_mode_names_accepted() {
    assert_eq!(decode("labelMode=arabic").label_mode, Some(LabelMode::Arabic));
    assert_eq!(decode("labelMode=english").label_mode, Some(LabelMode::English));
}

#[test]
fn test_partial_values_keep_remaining_slots() {
    let mut config = ViewConfig {
        values: ramp_values(),
        ..ViewConfig::default()
    };
    decode("values=5,oops,inf").apply_to(&mut config);

    assert_eq!(config.values.get(Region::Aleppo), 5.0);
    assert_eq!(config.values.get(Region::Damascus), 10.0);
    assert_eq!(config.values.get(Region::RuralDamascus), 20.0);
    assert_eq!(config.values.get(Region::AlHasakeh), 130.0);
}

#[test]
fn test_blank_value_slots_read_as_zero() {
    let mut config = ViewConfig {
        values: ramp_values(),
        ..ViewConfig::default()
    };
    assert_eq!(config.values.get(Region::Damascus), 10.0);

    decode("values=1,,3,4,%20%20").apply_to(&mut config);

    assert_eq!(config.values.get(Region::Aleppo), 1.0);
    assert_eq!(config.values.get(Region::Damascus), 0.0);
    assert_eq!(config.values.get(Region::RuralDamascus), 3.0);
    assert_eq!(config.values.get(Region::Daraa), 4.0);
    assert_eq!(config.values.get(Region::Quneitra), 0.0);
    assert_eq!(config.values.get(Region::AlHasakeh), 130.0);
}

#[test]
fn test_empty_values_field_keeps_every_slot() {
    let mut config = ViewConfig {
        values: ramp_values(),
        ..ViewConfig::default()
    };
    decode("values=").apply_to(&mut config);
    assert_eq!(config.values, ramp_values());
}

#[test]
fn test_empty_and_unknown_input() {
    for text in ["", "?", "zoom=7&lang=ar"] {
        assert_eq!(decode(text), PartialViewConfig::default());
    }
}

#[test]
fn test_first_key_occurrence_wins() {
    let partial = decode("palette=green&palette=purple");
    assert_eq!(partial.palette, Some(Palette::Green));
}

#[test]
fn test_decode_full_url() {
    let partial = decode("https://example.org/syria/?palette=orange&showNames=0#legend");
    assert_eq!(partial.palette, Some(Palette::Orange));
    assert_eq!(partial.show_names, Some(false));
}

// ============================================================================
// Share links
// ============================================================================

#[test]
fn test_share_link_decodes_to_same_config() {
    let config = sample_config();
    let link = share_link("https://example.org/syria/index.html?old=1", &config);

    assert!(link.starts_with("https://example.org/syria/index.html?palette=blue"));
    assert!(!link.contains("old=1"));
    assert_eq!(decode(&link).to_config(), config);
}
