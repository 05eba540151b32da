//! Activity sequencing
//!
//! The flattened traversal of all completable activities is the single
//! source of truth for "what comes next": multimedia items first (under a
//! synthetic `intro` container), then each tab's cards in order, then the
//! exercise card. Everything else ("is this the last card of its tab?",
//! "which tab must activate before focusing?") derives from this order.

use crate::lesson::model::{LessonDocument, SectionBody};

/// Synthetic container id for multimedia activities
pub const INTRO_CONTAINER: &str = "intro";

/// One completable activity in traversal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatItem {
    /// Completion key
    pub id: String,
    /// Enclosing container: `intro`, a tab id, or the exercise section id
    pub container: String,
}

/// Flatten a document into its canonical activity order.
///
/// Deterministic: the result follows document declaration order exactly,
/// and re-flattening an unchanged document yields an identical sequence.
pub fn flatten(doc: &LessonDocument) -> Vec<FlatItem> {
    let mut items = Vec::new();

    for section in &doc.sections {
        match &section.body {
            SectionBody::Multimedia { items: media } => {
                for item in media {
                    items.push(FlatItem {
                        id: item.id.clone(),
                        container: INTRO_CONTAINER.to_string(),
                    });
                }
            }
            SectionBody::Tabs { tabs } => {
                for tab in tabs {
                    for card in &tab.cards {
                        if !card.is_completable() {
                            continue;
                        }
                        if let Some(id) = card.id() {
                            items.push(FlatItem { id: id.to_string(), container: tab.id.clone() });
                        }
                    }
                }
            }
            SectionBody::Exercise { card } => {
                items.push(FlatItem { id: card.id.clone(), container: section.id.clone() });
            }
            _ => {}
        }
    }

    items
}

/// Where `go_to_next` should take the user from `current_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Focus a later activity without switching containers
    Focus { id: String },
    /// Activate `tab` first, then focus `id` once the tab has rendered
    SwitchTab { tab: String, id: String },
    /// No further activity; `go_to_next` is a no-op here
    End,
}

/// Compute the next step after `current_id` given the active tab.
///
/// An unknown or terminal id yields [`NextStep::End`]; advancing past the
/// end of a container moves to the first activity of the next one, switching
/// tabs when that container is a tab other than the active one.
pub fn next_step(
    doc: &LessonDocument,
    order: &[FlatItem],
    current_id: &str,
    active_tab: Option<&str>,
) -> NextStep {
    let Some(pos) = order.iter().position(|item| item.id == current_id) else {
        return NextStep::End;
    };
    let Some(next) = order.get(pos + 1) else {
        return NextStep::End;
    };

    let is_tab = doc
        .tabs()
        .is_some_and(|tabs| tabs.iter().any(|t| t.id == next.container));
    let needs_tab_switch = next.container != order[pos].container
        && is_tab
        && active_tab != Some(next.container.as_str());

    if needs_tab_switch {
        NextStep::SwitchTab { tab: next.container.clone(), id: next.id.clone() }
    } else {
        NextStep::Focus { id: next.id.clone() }
    }
}

/// Whether an activity is the last completable item of its container
pub fn is_last_in_container(order: &[FlatItem], id: &str) -> bool {
    let Some(pos) = order.iter().position(|item| item.id == id) else {
        return false;
    };
    !order[pos + 1..].iter().any(|item| item.container == order[pos].container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::model::{
        Accent, Card, ExerciseCard, MediaKind, MultimediaItem, Section, Tab, TextCard,
    };
    use proptest::prelude::*;

    fn media(id: &str) -> MultimediaItem {
        MultimediaItem {
            id: id.into(),
            kind: MediaKind::Audio,
            title: id.into(),
            subtitle: None,
            url: String::new(),
            button_text: None,
        }
    }

    fn card(id: &str) -> Card {
        Card::Basic(TextCard {
            id: id.into(),
            title: None,
            text: String::new(),
            button_text: None,
            accent: Accent::Neutral,
        })
    }

    fn sample_doc() -> LessonDocument {
        LessonDocument {
            metadata: None,
            header: None,
            sections: vec![
                Section::new(
                    "media",
                    SectionBody::Multimedia { items: vec![media("m1"), media("m2")] },
                ),
                Section::new(
                    "content",
                    SectionBody::Tabs {
                        tabs: vec![
                            Tab {
                                id: "tab-a".into(),
                                label: "A".into(),
                                cards: vec![card("a1"), card("a2")],
                            },
                            Tab { id: "tab-b".into(), label: "B".into(), cards: vec![card("b1")] },
                        ],
                    },
                ),
                Section::new(
                    "practice",
                    SectionBody::Exercise {
                        card: ExerciseCard {
                            id: "ex1".into(),
                            title: "Practice".into(),
                            instructions: vec![],
                            placeholder: None,
                            button_text: None,
                        },
                    },
                ),
            ],
        }
    }

    #[test]
    fn flatten_follows_document_order() {
        let order = flatten(&sample_doc());
        let ids: Vec<_> = order.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["m1", "m2", "a1", "a2", "b1", "ex1"]);

        assert_eq!(order[0].container, INTRO_CONTAINER);
        assert_eq!(order[2].container, "tab-a");
        assert_eq!(order[4].container, "tab-b");
        assert_eq!(order[5].container, "practice");
    }

    #[test]
    fn flatten_skips_unrenderable_cards() {
        let mut doc = sample_doc();
        if let SectionBody::Tabs { tabs } = &mut doc.sections[1].body {
            tabs[0].cards.push(Card::Unknown { id: Some("ghost".into()), kind: "odd".into() });
        }
        let order = flatten(&doc);
        assert!(!order.iter().any(|i| i.id == "ghost"));
    }

    #[test]
    fn next_within_container_stays_put() {
        let doc = sample_doc();
        let order = flatten(&doc);
        assert_eq!(next_step(&doc, &order, "m1", None), NextStep::Focus { id: "m2".into() });
        assert_eq!(
            next_step(&doc, &order, "a1", Some("tab-a")),
            NextStep::Focus { id: "a2".into() }
        );
    }

    #[test]
    fn next_across_tabs_switches_first() {
        let doc = sample_doc();
        let order = flatten(&doc);
        assert_eq!(
            next_step(&doc, &order, "a2", Some("tab-a")),
            NextStep::SwitchTab { tab: "tab-b".into(), id: "b1".into() }
        );
        // Already on the target tab: plain focus
        assert_eq!(
            next_step(&doc, &order, "a2", Some("tab-b")),
            NextStep::Focus { id: "b1".into() }
        );
    }

    #[test]
    fn next_from_media_into_first_tab_switches() {
        let doc = sample_doc();
        let order = flatten(&doc);
        assert_eq!(
            next_step(&doc, &order, "m2", None),
            NextStep::SwitchTab { tab: "tab-a".into(), id: "a1".into() }
        );
    }

    #[test]
    fn next_into_exercise_needs_no_tab_switch() {
        let doc = sample_doc();
        let order = flatten(&doc);
        assert_eq!(
            next_step(&doc, &order, "b1", Some("tab-b")),
            NextStep::Focus { id: "ex1".into() }
        );
    }

    #[test]
    fn terminal_and_unknown_ids_end_quietly() {
        let doc = sample_doc();
        let order = flatten(&doc);
        assert_eq!(next_step(&doc, &order, "ex1", Some("tab-b")), NextStep::End);
        assert_eq!(next_step(&doc, &order, "no-such-id", None), NextStep::End);
        assert_eq!(next_step(&doc, &[], "m1", None), NextStep::End);
    }

    #[test]
    fn last_in_container_is_structural() {
        let order = flatten(&sample_doc());
        assert!(!is_last_in_container(&order, "m1"));
        assert!(is_last_in_container(&order, "m2"));
        assert!(!is_last_in_container(&order, "a1"));
        assert!(is_last_in_container(&order, "a2"));
        assert!(is_last_in_container(&order, "b1"));
        assert!(is_last_in_container(&order, "ex1"));
    }

    proptest! {
        /// Flattening is deterministic and preserves declaration order for
        /// any mix of container sizes
        #[test]
        fn flatten_is_stable(media_count in 0usize..5, tab_sizes in proptest::collection::vec(0usize..4, 0..4)) {
            let mut sections = Vec::new();
            let mut expected = Vec::new();

            let items: Vec<_> = (0..media_count).map(|i| media(&format!("m{i}"))).collect();
            expected.extend(items.iter().map(|m| m.id.clone()));
            sections.push(Section::new("media", SectionBody::Multimedia { items }));

            let tabs: Vec<_> = tab_sizes
                .iter()
                .enumerate()
                .map(|(t, &n)| Tab {
                    id: format!("tab{t}"),
                    label: format!("Tab {t}"),
                    cards: (0..n).map(|c| card(&format!("t{t}c{c}"))).collect(),
                })
                .collect();
            for tab in &tabs {
                expected.extend(tab.cards.iter().filter_map(|c| c.id().map(str::to_owned)));
            }
            sections.push(Section::new("content", SectionBody::Tabs { tabs }));

            let doc = LessonDocument { metadata: None, header: None, sections };

            let first = flatten(&doc);
            let second = flatten(&doc);
            prop_assert_eq!(&first, &second);

            let ids: Vec<_> = first.iter().map(|i| i.id.clone()).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
