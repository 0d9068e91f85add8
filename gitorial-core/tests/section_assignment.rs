use gitorial_core::classify::{classify_records, Classified, TagKind};
use gitorial_core::contract::RecordStream;
use gitorial_core::pairing::pair_lessons;
use gitorial_core::sections::{assign_sections, PlannedSection, DEFAULT_SECTION_TITLE};
use gitorial_core::{ExtractError, SourceMode};

fn plan_from_tags(tags: &[&str], mode: SourceMode) -> Result<Vec<PlannedSection>, ExtractError> {
    let stream = RecordStream::from_tags(
        tags.iter()
            .enumerate()
            .map(|(i, tag)| (format!("r{i}"), tag.to_string(), tag.to_string())),
    );
    let classified = classify_records(&stream.records, mode);
    let markers: Vec<Classified> = classified
        .iter()
        .filter(|c| c.kind == TagKind::Section)
        .cloned()
        .collect();
    let units = pair_lessons(&classified, mode);
    assign_sections(&markers, units, mode)
}

fn assert_monotonic(sections: &[PlannedSection]) {
    for pair in sections.windows(2) {
        assert!(
            pair[0].boundary_position < pair[1].boundary_position,
            "boundaries must be strictly increasing: {:?} vs {:?}",
            pair[0].boundary_position,
            pair[1].boundary_position
        );
    }
    for (idx, section) in sections.iter().enumerate() {
        let next = sections.get(idx + 1).and_then(|s| s.boundary_position);
        for lesson in &section.lessons {
            assert!(
                section.boundary_position < Some(lesson.unit.position),
                "lesson {} sits before its section boundary",
                lesson.unit.title
            );
            if let Some(next) = next {
                assert!(
                    lesson.unit.position < next,
                    "lesson {} should belong to the following section",
                    lesson.unit.title
                );
            }
        }
    }
}

fn assert_contiguous_orders(sections: &[PlannedSection]) {
    let section_orders: Vec<usize> = sections.iter().map(|s| s.order).collect();
    assert_eq!(section_orders, (1..=sections.len()).collect::<Vec<_>>());
    for section in sections {
        let orders: Vec<usize> = section.lessons.iter().map(|l| l.order).collect();
        assert_eq!(
            orders,
            (1..=section.lessons.len()).collect::<Vec<_>>(),
            "lesson orders in {}",
            section.title
        );
    }
}

#[test]
fn test_lessons_land_in_closest_preceding_section() {
    let streams: Vec<Vec<&str>> = vec![
        vec!["section: A", "template: 1", "solution: 1", "section: B", "action: 2"],
        vec![
            "section: A",
            "section: B",
            "action: x",
            "action: y",
            "section: C",
            "template: z",
        ],
        vec!["section: Only", "action: a", "wip", "action: b", "readme: r"],
        vec!["section: Empty", "section: Full", "action: a"],
    ];

    for tags in streams {
        let sections = plan_from_tags(&tags, SourceMode::Commits).expect("plan should succeed");
        assert_monotonic(&sections);
        assert_contiguous_orders(&sections);
    }
}

#[test]
fn test_assignment_places_lessons_by_boundary() {
    let sections = plan_from_tags(
        &[
            "section: Intro",
            "action: Setup",
            "section: Core",
            "template: Loop",
            "solution: Loop",
            "action: Run",
        ],
        SourceMode::Commits,
    )
    .unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Intro");
    assert_eq!(sections[0].boundary_position, Some(0));
    assert_eq!(sections[0].lessons.len(), 1);
    assert_eq!(sections[1].title, "Core");
    let titles: Vec<&str> = sections[1]
        .lessons
        .iter()
        .map(|l| l.unit.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Loop", "Run"]);
    assert_eq!(sections[1].lessons[0].order, 1, "order restarts per section");
}

#[test]
fn test_no_markers_in_commit_mode_synthesizes_default_section() {
    let sections = plan_from_tags(&["template: X", "action: Y"], SourceMode::Commits).unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, DEFAULT_SECTION_TITLE);
    assert_eq!(sections[0].slug, "getting-started");
    assert_eq!(sections[0].boundary_position, None);
    assert_eq!(sections[0].lessons.len(), 2);
}

#[test]
fn test_no_markers_in_steps_mode_is_fatal() {
    let err = plan_from_tags(&["template: X", "solution: X"], SourceMode::Steps).unwrap_err();
    assert!(
        matches!(err, ExtractError::Configuration(_)),
        "expected configuration error, got {err:?}"
    );
}

#[test]
fn test_lessons_before_first_marker_get_a_leading_default_section() {
    let sections = plan_from_tags(
        &["action: Install", "section: Real", "action: Work"],
        SourceMode::Commits,
    )
    .unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, DEFAULT_SECTION_TITLE);
    assert_eq!(sections[0].lessons[0].unit.title, "Install");
    assert_eq!(sections[1].title, "Real");
    assert_eq!(sections[1].lessons[0].unit.title, "Work");
    assert_monotonic(&sections);
}

#[test]
fn test_colliding_slugs_are_suffixed_within_scope() {
    let sections = plan_from_tags(
        &[
            "section: Basics",
            "action: Hello, World",
            "action: Hello World!",
            "section: Basics?",
            "action: Hello World",
        ],
        SourceMode::Commits,
    )
    .unwrap();

    assert_eq!(sections[0].slug, "basics");
    assert_eq!(sections[1].slug, "basics-2");
    assert_eq!(sections[0].lessons[0].slug, "hello-world");
    assert_eq!(sections[0].lessons[1].slug, "hello-world-2");
    assert_eq!(
        sections[1].lessons[0].slug, "hello-world",
        "lesson slugs are scoped to their section"
    );
}
