use lane_roster::assets::{AssetResolver, AssetSource, IconScheme};
use lane_roster::detail::{DetailLayout, DetailState, build_content};
use lane_roster::state::{MISSING_DESCRIPTION, PlayerRecord};

fn keria() -> PlayerRecord {
    PlayerRecord::new("Keria", &["Sup", "Adc"])
        .with_description("Sup", "Engage and roaming support.")
        .with_description("Adc", "Can flex to bot carry.")
}

#[test]
fn starts_closed_and_opens_on_primary_role() {
    let mut detail = DetailState::default();
    assert!(!detail.is_open());
    detail.open(4, &keria(), None);
    let view = detail.view().expect("open");
    assert_eq!(view.record_index, 4);
    assert_eq!(view.active_role, Some(0));
}

#[test]
fn opens_on_requested_role_and_ignores_unknown_one() {
    let mut detail = DetailState::Closed;
    detail.open(0, &keria(), Some("Adc"));
    assert_eq!(detail.view().and_then(|v| v.active_role), Some(1));
    detail.open(0, &keria(), Some("Jungla"));
    assert_eq!(detail.view().and_then(|v| v.active_role), Some(0));
}

#[test]
fn selecting_second_role_keeps_view_open_and_swaps_content() {
    let record = keria();
    let resolver = AssetResolver::default();
    let mut detail = DetailState::Closed;
    detail.open(0, &record, None);

    let before = build_content(detail.view().unwrap(), &record, DetailLayout::RoleTabs, &resolver);
    assert!(detail.select_role(1));
    assert!(detail.is_open());
    let after = build_content(detail.view().unwrap(), &record, DetailLayout::RoleTabs, &resolver);

    assert_ne!(before.image, after.image);
    assert_ne!(before.sections, after.sections);
    assert_eq!(after.sections[0].body, "Can flex to bot carry.");
    assert!(after.role_buttons[1].active);
    assert!(!after.role_buttons[0].active);
}

#[test]
fn role_navigation_wraps() {
    let mut detail = DetailState::Closed;
    detail.open(0, &keria(), None);
    assert!(detail.next_role());
    assert!(detail.next_role());
    assert_eq!(detail.view().and_then(|v| v.active_role), Some(0));
    assert!(detail.prev_role());
    assert_eq!(detail.view().and_then(|v| v.active_role), Some(1));
    assert!(!detail.select_role(5));
}

#[test]
fn escape_closes_only_when_open() {
    let mut detail = DetailState::Closed;
    assert!(!detail.handle_escape());
    assert_eq!(detail, DetailState::Closed);

    detail.open(0, &keria(), None);
    assert!(detail.handle_escape());
    assert!(!detail.is_open());
    assert!(!detail.select_role(1));
}

#[test]
fn reopening_replaces_content() {
    let mut detail = DetailState::Closed;
    detail.open(0, &keria(), Some("Adc"));
    detail.open(3, &PlayerRecord::new("Zeus", &["Top"]), None);
    let view = detail.view().expect("open");
    assert_eq!(view.record_index, 3);
    assert_eq!(view.active_role, Some(0));
    assert_eq!(view.role_count(), 1);
}

#[test]
fn missing_description_uses_fallback_text() {
    let record = PlayerRecord::new("Faker", &["Medio", "Top"]).with_description("Medio", "Mage.");
    let resolver = AssetResolver::default();
    let mut detail = DetailState::Closed;
    detail.open(0, &record, Some("Top"));

    let single =
        build_content(detail.view().unwrap(), &record, DetailLayout::SingleRole, &resolver);
    assert_eq!(single.sections.len(), 1);
    assert_eq!(single.sections[0].body, MISSING_DESCRIPTION);
    assert!(single.role_buttons.is_empty());

    let all = build_content(detail.view().unwrap(), &record, DetailLayout::AllRoles, &resolver);
    assert_eq!(all.sections.len(), 2);
    assert_eq!(all.sections[0].body, "Mage.");
    assert_eq!(all.sections[1].body, MISSING_DESCRIPTION);
    assert!(all.sections.iter().all(|s| s.heading.is_some()));
}

#[test]
fn extra_description_keys_are_ignored() {
    let record = PlayerRecord::new("Zeus", &["Top"])
        .with_description("Top", "Carry top.")
        .with_description("Sup", "Never plays support.");
    let resolver = AssetResolver::default();
    let mut detail = DetailState::Closed;
    detail.open(0, &record, None);
    let all = build_content(detail.view().unwrap(), &record, DetailLayout::AllRoles, &resolver);
    assert_eq!(all.sections.len(), 1);
    assert_eq!(all.summary, "Plays the following roles: Top.");
}

#[test]
fn record_without_roles_shows_placeholder() {
    let record = PlayerRecord::new("Carla", &[]);
    let resolver = AssetResolver::default();
    let mut detail = DetailState::Closed;
    detail.open(0, &record, None);
    let view = detail.view().expect("open");
    assert_eq!(view.active_role, None);
    let content = build_content(view, &record, DetailLayout::RoleTabs, &resolver);
    assert!(content.image.is_placeholder());
    assert!(content.sections.is_empty());
    assert!(content.role_buttons.is_empty());
}

#[test]
fn unresolvable_image_file_falls_back_to_placeholder() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("Sup.png"), b"png").expect("write icon");
    let resolver = AssetResolver::new(IconScheme::ImageFiles {
        dir: dir.path().to_path_buf(),
        ext: "png".to_string(),
    });
    let record = keria();
    let mut detail = DetailState::Closed;
    detail.open(0, &record, None);

    let sup = build_content(detail.view().unwrap(), &record, DetailLayout::SingleRole, &resolver);
    assert_eq!(sup.image.source, AssetSource::File(dir.path().join("Sup.png")));

    detail.select_role(1);
    let adc = build_content(detail.view().unwrap(), &record, DetailLayout::SingleRole, &resolver);
    assert!(adc.image.is_placeholder());
    assert_eq!(resolver.take_missing(), vec!["Adc".to_string()]);
}
