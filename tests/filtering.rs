use lane_roster::filter::{apply, matches, matching_indices};
use lane_roster::state::{FilterCriteria, PlayerRecord, Role, RoleFilter};

fn roster() -> Vec<PlayerRecord> {
    vec![
        PlayerRecord::new("Zeus", &["Top"]),
        PlayerRecord::new("Oner", &["Jungla"]),
        PlayerRecord::new("Faker", &["Medio", "Top"]),
        PlayerRecord::new("Gumayusi", &["Adc"]),
        PlayerRecord::new("Keria", &["Sup", "Adc"]),
        PlayerRecord::new("Nameless", &[]),
    ]
}

fn criteria(search: &str, role: RoleFilter) -> FilterCriteria {
    FilterCriteria {
        search_text: search.to_string(),
        role,
    }
}

fn names(records: &[&PlayerRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

#[test]
fn default_criteria_return_everything_in_order() {
    let players = roster();
    let result = apply(&players, &FilterCriteria::default());
    assert_eq!(result.len(), players.len());
    for (got, want) in result.iter().zip(players.iter()) {
        assert_eq!(*got, want);
    }
}

#[test]
fn results_are_an_ordered_subset() {
    let players = roster();
    let cases = [
        criteria("e", RoleFilter::All),
        criteria("", RoleFilter::Only(Role::Adc)),
        criteria("a", RoleFilter::Only(Role::Top)),
        criteria("zzz", RoleFilter::All),
    ];
    for c in &cases {
        let indices = matching_indices(&players, c);
        assert!(indices.windows(2).all(|w| w[0] < w[1]), "order kept for {c:?}");
        let result = apply(&players, c);
        assert_eq!(result.len(), indices.len());
        for (record, idx) in result.iter().zip(&indices) {
            assert_eq!(*record, &players[*idx]);
        }
    }
}

#[test]
fn filtering_is_idempotent() {
    let players = roster();
    let c = criteria("er", RoleFilter::All);
    let once: Vec<PlayerRecord> = apply(&players, &c).into_iter().cloned().collect();
    let twice = apply(&once, &c);
    assert_eq!(names(&twice), vec!["Oner", "Faker", "Keria"]);
    assert_eq!(twice.len(), once.len());
}

#[test]
fn search_is_case_insensitive_substring() {
    let players = roster();
    let result = apply(&players, &criteria("KER", RoleFilter::All));
    assert_eq!(names(&result), vec!["Faker", "Keria"]);
    let result = apply(&players, &criteria("yus", RoleFilter::All));
    assert_eq!(names(&result), vec!["Gumayusi"]);
}

#[test]
fn multi_role_record_matches_each_of_its_roles() {
    let record = PlayerRecord::new("Ana Torres", &["Top", "Sup"]);
    assert!(matches(&record, &criteria("torr", RoleFilter::All)));
    assert!(matches(&record, &criteria("torr", RoleFilter::Only(Role::Sup))));
    assert!(matches(&record, &criteria("", RoleFilter::Only(Role::Top))));
    assert!(!matches(&record, &criteria("torr", RoleFilter::Only(Role::Jungla))));
    assert!(!matches(&record, &criteria("xyz", RoleFilter::All)));
}

#[test]
fn role_match_is_exact_tag() {
    let players = vec![
        PlayerRecord::new("lower", &["sup"]),
        PlayerRecord::new("proper", &["Sup"]),
    ];
    let result = apply(&players, &criteria("", RoleFilter::Only(Role::Sup)));
    assert_eq!(names(&result), vec!["proper"]);
}

#[test]
fn record_without_roles_only_matches_all() {
    let players = roster();
    assert!(
        apply(&players, &criteria("nameless", RoleFilter::All)).len() == 1
    );
    for role in Role::ALL {
        assert!(apply(&players, &criteria("nameless", RoleFilter::Only(role))).is_empty());
    }
}
