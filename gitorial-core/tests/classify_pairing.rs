use gitorial_core::classify::{classify_records, classify_tag, TagKind};
use gitorial_core::contract::RecordStream;
use gitorial_core::pairing::{pair_lessons, UnitKind};
use gitorial_core::{Record, SourceMode};

fn stream(tags: &[(&str, &str)]) -> RecordStream {
    RecordStream::from_tags(
        tags.iter()
            .map(|(identity, tag)| (identity.to_string(), tag.to_string(), tag.to_string())),
    )
}

#[test]
fn test_classify_tag_table_driven() {
    struct TestCase {
        tag: &'static str,
        expected: Option<(TagKind, &'static str)>,
    }

    let cases = vec![
        TestCase {
            tag: "section: Introduction",
            expected: Some((TagKind::Section, "Introduction")),
        },
        TestCase {
            tag: "template:   Loops  ",
            expected: Some((TagKind::Template, "Loops")),
        },
        TestCase {
            tag: "solution:Loops",
            expected: Some((TagKind::Solution, "Loops")),
        },
        TestCase {
            tag: "action: Install deps",
            expected: Some((TagKind::Action, "Install deps")),
        },
        TestCase {
            tag: "readme: top level docs",
            expected: None,
        },
        TestCase {
            tag: "Template: wrong case",
            expected: Some((TagKind::Unrecognized, "Template: wrong case")),
        },
        TestCase {
            tag: "fix typo",
            expected: Some((TagKind::Unrecognized, "fix typo")),
        },
    ];

    for tc in cases {
        assert_eq!(classify_tag(tc.tag), tc.expected, "tag {:?}", tc.tag);
    }
}

#[test]
fn test_classify_records_drops_readme_and_uses_mode_title() {
    let records = RecordStream::from_tags(vec![
        ("a", "section: Basics", "Step 1"),
        ("b", "readme: hello", "Step 2"),
        ("c", "template: Vars", "Variables"),
    ]);

    let commits = classify_records(&records.records, SourceMode::Commits);
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].title, "Basics");
    assert_eq!(commits[1].title, "Vars");
    assert_eq!(commits[1].position(), 2, "positions refer to the raw stream");

    let steps = classify_records(&records.records, SourceMode::Steps);
    assert_eq!(steps[0].title, "Step 1");
    assert_eq!(steps[1].title, "Variables");
}

#[test]
fn test_record_stream_reassigns_positions_from_order() {
    let records = vec![
        Record {
            position: 7,
            tag: "section: A".into(),
            title: "A".into(),
            identity: "h1".into(),
        },
        Record {
            position: 7,
            tag: "template: B".into(),
            title: "B".into(),
            identity: "h2".into(),
        },
    ];
    let s = RecordStream::new(records);
    assert_eq!(s.len(), 2);
    let positions: Vec<(&str, usize)> = s
        .records
        .iter()
        .map(|r| (r.identity.as_str(), r.position))
        .collect();
    assert_eq!(positions, vec![("h1", 0), ("h2", 1)]);
}

#[test]
fn test_commit_pairing_matches_equal_titles() {
    let s = stream(&[
        ("t1", "template: Loop"),
        ("x", "wip"),
        ("s1", "solution:  Loop "),
        ("a1", "action: Setup"),
        ("t2", "template: Lonely"),
    ]);
    let classified = classify_records(&s.records, SourceMode::Commits);
    let units = pair_lessons(&classified, SourceMode::Commits);

    assert_eq!(units.len(), 3, "unrecognized commits are ignored in commit mode");
    assert_eq!(
        units[0].kind,
        UnitKind::Paired {
            primary: "t1".into(),
            secondary: Some("s1".into())
        }
    );
    assert_eq!(units[1].kind, UnitKind::Single { identity: "a1".into() });
    assert_eq!(
        units[2].kind,
        UnitKind::Paired {
            primary: "t2".into(),
            secondary: None
        }
    );
    let provisional: Vec<usize> = units.iter().map(|u| u.provisional_order).collect();
    assert_eq!(provisional, vec![1, 2, 3]);
}

#[test]
fn test_commit_pairing_first_found_solution_wins_for_every_template() {
    struct TestCase {
        name: &'static str,
        tags: Vec<(&'static str, &'static str)>,
        expected: Vec<(&'static str, Option<&'static str>)>,
    }

    let cases = vec![
        TestCase {
            name: "templates sharing a title share the one solution",
            tags: vec![
                ("t1", "template: A"),
                ("t2", "template: A"),
                ("s1", "solution: A"),
            ],
            expected: vec![("t1", Some("s1")), ("t2", Some("s1"))],
        },
        TestCase {
            name: "a later duplicate solution never wins",
            tags: vec![
                ("t1", "template: Step"),
                ("s1", "solution: Step"),
                ("t2", "template: Step"),
                ("s2", "solution: Step"),
            ],
            expected: vec![("t1", Some("s1")), ("t2", Some("s1"))],
        },
    ];

    for tc in cases {
        let s = stream(&tc.tags);
        let classified = classify_records(&s.records, SourceMode::Commits);
        let units = pair_lessons(&classified, SourceMode::Commits);
        let got: Vec<UnitKind> = units.into_iter().map(|u| u.kind).collect();
        let expected: Vec<UnitKind> = tc
            .expected
            .iter()
            .map(|(primary, secondary)| UnitKind::Paired {
                primary: primary.to_string(),
                secondary: secondary.map(str::to_string),
            })
            .collect();
        assert_eq!(got, expected, "{}", tc.name);
    }
}

#[test]
fn test_steps_pairing_by_adjacency() {
    struct TestCase {
        name: &'static str,
        tags: Vec<(&'static str, &'static str)>,
        expected_secondary: Option<&'static str>,
    }

    let cases = vec![
        TestCase {
            name: "solution right after template pairs regardless of title",
            tags: vec![("0001", "template: A"), ("0002", "solution: something else")],
            expected_secondary: Some("0002"),
        },
        TestCase {
            name: "solution two steps later does not pair",
            tags: vec![
                ("0001", "template: A"),
                ("0002", "action: B"),
                ("0003", "solution: A"),
            ],
            expected_secondary: None,
        },
    ];

    for tc in cases {
        let s = stream(&tc.tags);
        let classified = classify_records(&s.records, SourceMode::Steps);
        let units = pair_lessons(&classified, SourceMode::Steps);
        match &units[0].kind {
            UnitKind::Paired { primary, secondary } => {
                assert_eq!(primary, "0001", "{}", tc.name);
                assert_eq!(secondary.as_deref(), tc.expected_secondary, "{}", tc.name);
            }
            other => panic!("{}: expected paired unit, got {:?}", tc.name, other),
        }
    }
}

#[test]
fn test_steps_pairing_surfaces_unrecognized_and_orphan_solutions() {
    let s = stream(&[
        ("0001", "section: S"),
        ("0002", "notes for later"),
        ("0003", "solution: orphan"),
        ("0004", "template: T"),
        ("0005", "solution: T"),
    ]);
    let classified = classify_records(&s.records, SourceMode::Steps);
    let units = pair_lessons(&classified, SourceMode::Steps);

    let kinds: Vec<(usize, TagKind)> = units.iter().map(|u| (u.position, u.source_kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (1, TagKind::Unrecognized),
            (2, TagKind::Solution),
            (3, TagKind::Template),
        ],
        "units are ordered by stream position"
    );
    assert!(units[2].is_paired());
    assert!(!units[0].is_paired());
}
