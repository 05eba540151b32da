//! Lesson document normalizer
//!
//! Lesson JSON exists in several historically-evolving shapes: metadata and
//! header are optionally absent, section and card types go by synonyms,
//! multimedia items discriminate on `type` or `mediaType`, and colors are
//! either semantic tokens or literal style hints. This module folds every
//! known shape into the one model in [`super::model`].
//!
//! Normalization is lenient per section and card: an unrecognized type
//! becomes an explicit `Unknown` placeholder instead of failing the whole
//! document. Only a document without a `sections` array is rejected.

use serde_json::{Map, Value};
use thiserror::Error;

use super::model::{
    Accent, AlertCard, BadgeSpec, Card, CertificateInfo, ExerciseCard, FooterLink,
    GamificationSpec, HeaderInfo, LessonDocument, LessonMetadata, MediaKind, MultimediaItem,
    NavItem, ProfileCard, QuizCard, QuizQuestion, Section, SectionBody, Tab, TextCard,
    DEFAULT_POINTS_PER_SECTION,
};

/// Errors for documents no known shape can explain
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("lesson document is not a JSON object")]
    NotAnObject,
    #[error("lesson document has no `sections` array")]
    MissingSections,
    #[error("lesson document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse and normalize a lesson document from JSON text
pub fn parse_document(text: &str) -> Result<LessonDocument, SchemaError> {
    let value: Value = serde_json::from_str(text)?;
    normalize(&value)
}

/// Normalize an already-parsed JSON value into the canonical model
pub fn normalize(value: &Value) -> Result<LessonDocument, SchemaError> {
    let root = value.as_object().ok_or(SchemaError::NotAnObject)?;

    let sections = root
        .get("sections")
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingSections)?;

    let sections = sections
        .iter()
        .enumerate()
        .map(|(idx, raw)| normalize_section(raw, idx))
        .collect();

    Ok(LessonDocument {
        metadata: root.get("metadata").and_then(normalize_metadata),
        header: root.get("header").and_then(normalize_header),
        sections,
    })
}

/// First string found under any of the given keys
fn str_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| obj.get(*k)).and_then(Value::as_str).map(str::to_owned)
}

/// Array of strings under any of the given keys; a bare string counts as a
/// one-element list
fn string_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match keys.iter().find_map(|k| obj.get(*k)) {
        Some(Value::Array(items)) => {
            items.iter().filter_map(Value::as_str).map(str::to_owned).collect()
        }
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn accent_field(obj: &Map<String, Value>, keys: &[&str]) -> Accent {
    str_field(obj, keys).map(|hint| Accent::from_hint(&hint)).unwrap_or_default()
}

fn normalize_metadata(value: &Value) -> Option<LessonMetadata> {
    let obj = value.as_object()?;

    let gamification = obj
        .get("gamification")
        .and_then(Value::as_object)
        .map(|g| GamificationSpec {
            points_per_section: g
                .get("pointsPerSection")
                .and_then(Value::as_u64)
                .map(|p| p as u32)
                .unwrap_or(DEFAULT_POINTS_PER_SECTION),
            badges: g
                .get("badges")
                .and_then(Value::as_object)
                .map(|badges| {
                    badges
                        .iter()
                        .filter_map(|(key, spec)| {
                            Some((key.clone(), normalize_badge(spec.as_object()?)?))
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .unwrap_or_default();

    Some(LessonMetadata {
        title: str_field(obj, &["title"]).unwrap_or_default(),
        subtitle: str_field(obj, &["subtitle"]),
        total_sections: obj.get("totalSections").and_then(Value::as_u64).map(|n| n as usize),
        gamification,
    })
}

fn normalize_badge(obj: &Map<String, Value>) -> Option<BadgeSpec> {
    Some(BadgeSpec {
        label: str_field(obj, &["label"])?,
        icon: str_field(obj, &["icon"]).unwrap_or_default(),
        accent: accent_field(obj, &["color", "accent"]),
        threshold: obj.get("threshold").and_then(Value::as_u64)? as usize,
    })
}

fn normalize_header(value: &Value) -> Option<HeaderInfo> {
    let obj = value.as_object()?;

    let certificate = obj
        .get("certificateInfo")
        .and_then(Value::as_object)
        .and_then(|c| {
            Some(CertificateInfo {
                title: str_field(c, &["title"])?,
                text: str_field(c, &["text"]).unwrap_or_default(),
            })
        });

    Some(HeaderInfo {
        progress_label: str_field(obj, &["progressLabel", "progress_label"])?,
        certificate,
    })
}

fn normalize_section(value: &Value, idx: usize) -> Section {
    let Some(obj) = value.as_object() else {
        return Section::new(format!("section-{idx}"), SectionBody::Unknown {
            kind: "(not an object)".into(),
        });
    };

    let id = str_field(obj, &["id"]).unwrap_or_else(|| format!("section-{idx}"));
    let kind = str_field(obj, &["type"]).unwrap_or_default();

    let body = match kind.as_str() {
        "intro" | "text_block" => SectionBody::Intro {
            paragraphs: string_list(obj, &["content", "paragraphs"]),
        },
        "navigation" | "navigation_grid" => SectionBody::Navigation {
            items: array_of(obj, "items", normalize_nav_item),
        },
        "multimedia" => SectionBody::Multimedia {
            items: array_of(obj, "items", normalize_multimedia_item),
        },
        "tabs" => SectionBody::Tabs { tabs: array_of(obj, "tabs", normalize_tab) },
        "expandable_section" => SectionBody::Expandable { cards: card_list(obj.get("content")) },
        "exercise" => match obj.get("content").and_then(Value::as_object).and_then(exercise_card) {
            Some(card) => SectionBody::Exercise { card },
            None => SectionBody::Unknown { kind },
        },
        "quiz" => SectionBody::Quiz { questions: array_of(obj, "questions", normalize_question) },
        "footer" | "simple_footer" => SectionBody::Footer {
            links: array_of(obj, "links", |v| {
                let l = v.as_object()?;
                Some(FooterLink {
                    label: str_field(l, &["label"])?,
                    url: str_field(l, &["url", "href"]).unwrap_or_default(),
                })
            }),
            copyright: str_field(obj, &["copyright"]),
        },
        _ => SectionBody::Unknown { kind },
    };

    Section { id, title: str_field(obj, &["title"]), subtitle: str_field(obj, &["subtitle"]), body }
}

fn array_of<T>(
    obj: &Map<String, Value>,
    key: &str,
    f: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|v| f(v)).collect())
        .unwrap_or_default()
}

fn normalize_nav_item(value: &Value) -> Option<NavItem> {
    let obj = value.as_object()?;
    Some(NavItem {
        label: str_field(obj, &["label"])?,
        icon: str_field(obj, &["icon"]),
        target: str_field(obj, &["target"])?,
        tab: str_field(obj, &["tab"]),
    })
}

fn normalize_multimedia_item(value: &Value) -> Option<MultimediaItem> {
    let obj = value.as_object()?;
    // Discriminant moved from `type` to `mediaType` at some point; accept
    // both, and let unrecognized values degrade to audio.
    let kind = match str_field(obj, &["type", "mediaType"]).as_deref() {
        Some("video") => MediaKind::Video,
        _ => MediaKind::Audio,
    };
    Some(MultimediaItem {
        id: str_field(obj, &["id"])?,
        kind,
        title: str_field(obj, &["title"]).unwrap_or_default(),
        subtitle: str_field(obj, &["subtitle"]),
        url: str_field(obj, &["url"]).unwrap_or_default(),
        button_text: str_field(obj, &["buttonText", "button_text"]),
    })
}

fn normalize_tab(value: &Value) -> Option<Tab> {
    let obj = value.as_object()?;
    Some(Tab {
        id: str_field(obj, &["id"])?,
        label: str_field(obj, &["label"]).unwrap_or_default(),
        cards: card_list(obj.get("content")),
    })
}

/// Cards arrive as an array or, in older documents, a single object
fn card_list(value: Option<&Value>) -> Vec<Card> {
    match value {
        Some(Value::Array(items)) => items.iter().map(normalize_card).collect(),
        Some(obj @ Value::Object(_)) => vec![normalize_card(obj)],
        _ => Vec::new(),
    }
}

fn normalize_card(value: &Value) -> Card {
    let Some(obj) = value.as_object() else {
        return Card::Unknown { id: None, kind: "(not an object)".into() };
    };

    let id = str_field(obj, &["id"]);
    let kind = str_field(obj, &["type"]).unwrap_or_default();

    // A card without an id has no completion key and cannot be tracked;
    // surface it as unrenderable rather than inventing an unstable key.
    let Some(id) = id else {
        return Card::Unknown { id: None, kind };
    };

    match kind.as_str() {
        "card" => Card::Basic(text_card(obj, id)),
        "highlight_card" | "highlight_box" => Card::Highlight(text_card(obj, id)),
        "trait_card" | "profile_card" => Card::Profile(ProfileCard {
            name: str_field(obj, &["name", "title"]).unwrap_or_default(),
            archetype: str_field(obj, &["archetype"]),
            icon: str_field(obj, &["icon"]),
            accent: accent_field(obj, &["color", "style"]),
            body: str_field(obj, &["body"]),
            pain: str_field(obj, &["pain"]),
            power: str_field(obj, &["power"]),
            story: str_field(obj, &["story"]),
            id,
        }),
        "alert_card" => Card::Alert(AlertCard {
            title: str_field(obj, &["title"]),
            subtitle: str_field(obj, &["subtitle"]),
            text: str_field(obj, &["text"]),
            list: string_list(obj, &["list"]),
            highlight: str_field(obj, &["highlightBox", "highlight"]),
            button_text: str_field(obj, &["buttonText", "button_text"]),
            id,
        }),
        "exercise_card" => match exercise_card_with_id(obj, id.clone()) {
            Some(card) => Card::Exercise(card),
            None => Card::Unknown { id: Some(id), kind },
        },
        "quiz_card" => Card::Quiz(QuizCard {
            questions: array_of(obj, "questions", normalize_question),
            id,
        }),
        _ => Card::Unknown { id: Some(id), kind },
    }
}

fn text_card(obj: &Map<String, Value>, id: String) -> TextCard {
    TextCard {
        title: str_field(obj, &["title"]),
        text: str_field(obj, &["text"]).unwrap_or_default(),
        button_text: str_field(obj, &["buttonText", "button_text"]),
        accent: accent_field(obj, &["style", "color"]),
        id,
    }
}

fn exercise_card(obj: &Map<String, Value>) -> Option<ExerciseCard> {
    let id = str_field(obj, &["id"])?;
    exercise_card_with_id(obj, id)
}

fn exercise_card_with_id(obj: &Map<String, Value>, id: String) -> Option<ExerciseCard> {
    Some(ExerciseCard {
        title: str_field(obj, &["title"]).unwrap_or_default(),
        instructions: string_list(obj, &["instructions", "steps"]),
        placeholder: str_field(obj, &["placeholder"]),
        button_text: str_field(obj, &["buttonText", "button_text"]),
        id,
    })
}

fn normalize_question(value: &Value) -> Option<QuizQuestion> {
    let obj = value.as_object()?;
    Some(QuizQuestion {
        id: obj.get("id").and_then(Value::as_u64)? as u32,
        question: str_field(obj, &["question"])?,
        options: string_list(obj, &["options"]),
        correct_answer: str_field(obj, &["correctAnswer", "correct_answer"])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_document_without_sections() {
        assert!(matches!(normalize(&json!({})), Err(SchemaError::MissingSections)));
        assert!(matches!(normalize(&json!([])), Err(SchemaError::NotAnObject)));
        assert!(matches!(
            normalize(&json!({"sections": "oops"})),
            Err(SchemaError::MissingSections)
        ));
    }

    #[test]
    fn metadata_and_header_are_optional() {
        let doc = normalize(&json!({"sections": []})).unwrap();
        assert!(doc.metadata.is_none());
        assert!(doc.header.is_none());
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn points_per_section_defaults_to_ten() {
        let doc = normalize(&json!({
            "metadata": {"title": "T", "gamification": {}},
            "sections": []
        }))
        .unwrap();
        assert_eq!(doc.points_per_section(), 10);
    }

    #[test]
    fn section_type_synonyms_normalize() {
        let doc = normalize(&json!({"sections": [
            {"id": "a", "type": "text_block", "content": ["one", "two"]},
            {"id": "b", "type": "navigation_grid", "items": []},
            {"id": "c", "type": "simple_footer"},
        ]}))
        .unwrap();

        assert!(matches!(&doc.sections[0].body, SectionBody::Intro { paragraphs } if paragraphs.len() == 2));
        assert!(matches!(&doc.sections[1].body, SectionBody::Navigation { .. }));
        assert!(matches!(&doc.sections[2].body, SectionBody::Footer { .. }));
    }

    #[test]
    fn card_type_synonyms_normalize() {
        let doc = normalize(&json!({"sections": [
            {"id": "t", "type": "tabs", "tabs": [
                {"id": "tab1", "label": "Tab", "content": [
                    {"id": "h", "type": "highlight_box", "text": "hi"},
                    {"id": "p", "type": "profile_card", "name": "Helper"},
                ]}
            ]}
        ]}))
        .unwrap();

        let SectionBody::Tabs { tabs } = &doc.sections[0].body else { panic!("expected tabs") };
        assert!(matches!(tabs[0].cards[0], Card::Highlight(_)));
        assert!(matches!(tabs[0].cards[1], Card::Profile(_)));
    }

    #[test]
    fn unknown_types_become_placeholders() {
        let doc = normalize(&json!({"sections": [
            {"id": "x", "type": "hologram"},
            {"id": "t", "type": "tabs", "tabs": [
                {"id": "tab1", "label": "Tab", "content": [
                    {"id": "c1", "type": "spinner_card"},
                    {"type": "card", "text": "no id"},
                ]}
            ]}
        ]}))
        .unwrap();

        assert!(matches!(&doc.sections[0].body, SectionBody::Unknown { kind } if kind == "hologram"));
        let SectionBody::Tabs { tabs } = &doc.sections[1].body else { panic!("expected tabs") };
        assert!(matches!(&tabs[0].cards[0], Card::Unknown { id: Some(_), .. }));
        assert!(matches!(&tabs[0].cards[1], Card::Unknown { id: None, .. }));
    }

    #[test]
    fn multimedia_discriminant_accepts_both_spellings() {
        let doc = normalize(&json!({"sections": [
            {"id": "m", "type": "multimedia", "items": [
                {"id": "a1", "type": "audio", "title": "Listen", "url": "a.m4a"},
                {"id": "v1", "mediaType": "video", "title": "Watch", "url": "v.mp4"},
            ]}
        ]}))
        .unwrap();

        let SectionBody::Multimedia { items } = &doc.sections[0].body else {
            panic!("expected multimedia")
        };
        assert_eq!(items[0].kind, MediaKind::Audio);
        assert_eq!(items[1].kind, MediaKind::Video);
    }

    #[test]
    fn expandable_content_accepts_single_card_or_array() {
        let doc = normalize(&json!({"sections": [
            {"id": "e1", "type": "expandable_section",
             "content": {"id": "only", "type": "card", "text": "solo"}},
            {"id": "e2", "type": "expandable_section",
             "content": [{"id": "c1", "type": "card"}, {"id": "c2", "type": "card"}]},
        ]}))
        .unwrap();

        let SectionBody::Expandable { cards } = &doc.sections[0].body else { panic!() };
        assert_eq!(cards.len(), 1);
        let SectionBody::Expandable { cards } = &doc.sections[1].body else { panic!() };
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn badge_color_hints_normalize_to_accents() {
        let doc = normalize(&json!({
            "metadata": {"title": "T", "gamification": {
                "pointsPerSection": 50,
                "badges": {
                    "starter": {"label": "Starter", "icon": "🌱",
                                "color": "bg-green-100 text-green-800", "threshold": 2},
                    "master": {"label": "Master", "icon": "👑",
                               "color": "purple", "threshold": 8}
                }
            }},
            "sections": []
        }))
        .unwrap();

        let badges = doc.badge_specs();
        assert_eq!(badges["starter"].accent, Accent::Green);
        assert_eq!(badges["master"].accent, Accent::Purple);
        assert_eq!(doc.points_per_section(), 50);
    }

    #[test]
    fn exercise_section_wraps_single_card() {
        let doc = normalize(&json!({"sections": [
            {"id": "ex", "type": "exercise", "title": "Practice",
             "content": {"id": "ex1", "title": "Try it",
                         "instructions": ["step one", "step two"],
                         "placeholder": "notes...", "buttonText": "Done"}}
        ]}))
        .unwrap();

        let SectionBody::Exercise { card } = &doc.sections[0].body else { panic!() };
        assert_eq!(card.id, "ex1");
        assert_eq!(card.instructions.len(), 2);
    }

    #[test]
    fn quiz_questions_normalize() {
        let doc = normalize(&json!({"sections": [
            {"id": "q", "type": "quiz", "questions": [
                {"id": 1, "question": "Q?", "options": ["X", "Y"], "correctAnswer": "X"}
            ]}
        ]}))
        .unwrap();

        let SectionBody::Quiz { questions } = &doc.sections[0].body else { panic!() };
        assert_eq!(questions[0].correct_answer, "X");
    }
}
