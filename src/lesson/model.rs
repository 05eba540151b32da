//! Content model for lessons
//!
//! This module defines the normalized in-memory representation of a lesson
//! document. Raw documents arrive in several historical JSON shapes; the
//! normalizer in [`super::schema`] folds them all into this one model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Points awarded per completed activity when the document does not say
pub const DEFAULT_POINTS_PER_SECTION: u32 = 10;

/// A complete normalized lesson document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonDocument {
    /// Lesson metadata (title, totals, gamification). Optional: older
    /// documents carry none, and the dashboard is simply omitted.
    pub metadata: Option<LessonMetadata>,
    /// Header copy (progress label, certificate blurb)
    pub header: Option<HeaderInfo>,
    /// Sections in document order
    pub sections: Vec<Section>,
}

impl LessonDocument {
    /// Total activity count declared by the document, if any.
    ///
    /// When absent the caller derives the total from the flattened
    /// completable-item count instead of the raw section count, which
    /// undercounts tabs.
    pub fn declared_total(&self) -> Option<usize> {
        self.metadata.as_ref().and_then(|m| m.total_sections)
    }

    /// Points awarded per completed activity
    pub fn points_per_section(&self) -> u32 {
        self.metadata
            .as_ref()
            .map(|m| m.gamification.points_per_section)
            .unwrap_or(DEFAULT_POINTS_PER_SECTION)
    }

    /// Badge threshold table (empty when the document has no gamification)
    pub fn badge_specs(&self) -> BTreeMap<String, BadgeSpec> {
        self.metadata.as_ref().map(|m| m.gamification.badges.clone()).unwrap_or_default()
    }

    /// Find a section by id
    pub fn find_section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// The first tabs section, if any
    pub fn tabs(&self) -> Option<&[Tab]> {
        self.sections.iter().find_map(|s| match &s.body {
            SectionBody::Tabs { tabs } => Some(tabs.as_slice()),
            _ => None,
        })
    }

    /// Id of the first tab in document order
    pub fn first_tab_id(&self) -> Option<&str> {
        self.tabs().and_then(|tabs| tabs.first()).map(|t| t.id.as_str())
    }

    /// Id of the quiz section, if the document has one
    pub fn quiz_section_id(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match &s.body {
            SectionBody::Quiz { .. } => Some(s.id.as_str()),
            _ => None,
        })
    }
}

/// Lesson metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonMetadata {
    /// Display title
    pub title: String,
    /// Display subtitle
    pub subtitle: Option<String>,
    /// Declared activity total. Absent in older documents.
    pub total_sections: Option<usize>,
    /// Gamification configuration
    pub gamification: GamificationSpec,
}

/// Gamification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationSpec {
    /// Points per completed activity
    pub points_per_section: u32,
    /// Badge table keyed by badge key, ordered for stable evaluation
    pub badges: BTreeMap<String, BadgeSpec>,
}

impl Default for GamificationSpec {
    fn default() -> Self {
        Self { points_per_section: DEFAULT_POINTS_PER_SECTION, badges: BTreeMap::new() }
    }
}

/// A single badge definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeSpec {
    /// Display label
    pub label: String,
    /// Display icon (emoji or icon name, passed through)
    pub icon: String,
    /// Accent color
    pub accent: Accent,
    /// Completed-activity count required to earn the badge
    pub threshold: usize,
}

/// Header copy shown above the lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Label next to the progress bar
    pub progress_label: String,
    /// Certificate blurb, when the lesson offers one
    pub certificate: Option<CertificateInfo>,
}

/// Certificate blurb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateInfo {
    pub title: String,
    pub text: String,
}

/// A top-level section of the lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique id within the document
    pub id: String,
    /// Section title
    pub title: Option<String>,
    /// Section subtitle
    pub subtitle: Option<String>,
    /// Variant payload
    pub body: SectionBody,
}

impl Section {
    /// Create a section with no title or subtitle
    pub fn new(id: impl Into<String>, body: SectionBody) -> Self {
        Self { id: id.into(), title: None, subtitle: None, body }
    }
}

/// Section payload, one variant per section type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SectionBody {
    /// Introductory prose (`intro` / `text_block`)
    Intro { paragraphs: Vec<String> },
    /// Grid of jump targets (`navigation` / `navigation_grid`)
    Navigation { items: Vec<NavItem> },
    /// Audio/video activities
    Multimedia { items: Vec<MultimediaItem> },
    /// Tab group, one tab active at a time
    Tabs { tabs: Vec<Tab> },
    /// Independently collapsible card group (`expandable_section`)
    Expandable { cards: Vec<Card> },
    /// Single exercise with disclosure
    Exercise { card: ExerciseCard },
    /// Quiz with in-memory answers
    Quiz { questions: Vec<QuizQuestion> },
    /// Footer aggregate (`footer` / `simple_footer`)
    Footer { links: Vec<FooterLink>, copyright: Option<String> },
    /// Section type this player does not know; rendered as an inert
    /// placeholder so one bad section never takes the page down
    Unknown { kind: String },
}

/// A navigation grid entry: jump to `target`, optionally switching tabs first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub icon: Option<String>,
    /// Section or card id to focus
    pub target: String,
    /// Tab that contains the target, when it lives inside a tab group
    pub tab: Option<String>,
}

/// Kind of multimedia activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Audio,
    Video,
}

/// An audio or video activity with a completion toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultimediaItem {
    /// Completion key
    pub id: String,
    pub kind: MediaKind,
    pub title: String,
    pub subtitle: Option<String>,
    /// Media location. Delivery is out of scope; the player shows metadata.
    pub url: String,
    pub button_text: Option<String>,
}

/// A tab within a tab group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub label: String,
    /// Cards in document order
    pub cards: Vec<Card>,
}

/// A renderable, independently completable unit inside a tab or
/// expandable section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Card {
    /// Plain content card (`card`)
    Basic(TextCard),
    /// Emphasized content card (`highlight_card` / `highlight_box`)
    Highlight(TextCard),
    /// Persona profile card (`trait_card` / `profile_card`)
    Profile(ProfileCard),
    /// Warning card with a bullet list (`alert_card`)
    Alert(AlertCard),
    /// Exercise card (`exercise_card`)
    Exercise(ExerciseCard),
    /// Inline quiz card (`quiz_card`)
    Quiz(QuizCard),
    /// Card type this player does not know; rendered as a placeholder
    Unknown { id: Option<String>, kind: String },
}

impl Card {
    /// Completion key, when the card is completable
    pub fn id(&self) -> Option<&str> {
        match self {
            Card::Basic(c) | Card::Highlight(c) => Some(&c.id),
            Card::Profile(c) => Some(&c.id),
            Card::Alert(c) => Some(&c.id),
            Card::Exercise(c) => Some(&c.id),
            Card::Quiz(c) => Some(&c.id),
            Card::Unknown { id, .. } => id.as_deref(),
        }
    }

    /// Whether this card participates in completion tracking
    pub fn is_completable(&self) -> bool {
        !matches!(self, Card::Unknown { .. })
    }
}

/// Text card payload, shared by `Basic` and `Highlight`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCard {
    pub id: String,
    pub title: Option<String>,
    /// Body text with inline `**bold**` markup
    pub text: String,
    pub button_text: Option<String>,
    pub accent: Accent,
}

/// Persona profile card payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCard {
    pub id: String,
    pub name: String,
    pub archetype: Option<String>,
    pub icon: Option<String>,
    pub accent: Accent,
    pub body: Option<String>,
    pub pain: Option<String>,
    pub power: Option<String>,
    pub story: Option<String>,
}

/// Warning card payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertCard {
    pub id: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text: Option<String>,
    pub list: Vec<String>,
    /// Emphasized one-liner below the list
    pub highlight: Option<String>,
    pub button_text: Option<String>,
}

/// Exercise card payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCard {
    pub id: String,
    pub title: String,
    pub instructions: Vec<String>,
    /// Placeholder for the scratch input (not persisted)
    pub placeholder: Option<String>,
    pub button_text: Option<String>,
}

/// Inline quiz card payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizCard {
    pub id: String,
    pub questions: Vec<QuizQuestion>,
}

/// One quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Footer link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

/// Semantic accent color for cards and badges.
///
/// Documents express color either as a token (`"green"`) or as literal
/// style hints (`"bg-green-100 text-green-800"`); both normalize here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accent {
    #[default]
    Neutral,
    Red,
    Green,
    Blue,
    Amber,
    Purple,
    Cyan,
}

impl Accent {
    const KNOWN: [(&'static str, Accent); 8] = [
        ("red", Accent::Red),
        ("green", Accent::Green),
        ("emerald", Accent::Green),
        ("blue", Accent::Blue),
        ("amber", Accent::Amber),
        ("orange", Accent::Amber),
        ("purple", Accent::Purple),
        ("cyan", Accent::Cyan),
    ];

    /// Normalize a color hint: a bare token, or any style string that
    /// mentions a known color name. Unrecognized hints fall back to neutral.
    pub fn from_hint(hint: &str) -> Self {
        let hint = hint.to_lowercase();
        for (name, accent) in Self::KNOWN {
            if hint == name || hint.split(|c: char| !c.is_alphabetic()).any(|w| w == name) {
                return accent;
            }
        }
        Accent::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_tabs() -> LessonDocument {
        LessonDocument {
            metadata: None,
            header: None,
            sections: vec![
                Section::new("intro", SectionBody::Intro { paragraphs: vec!["Hello".into()] }),
                Section::new(
                    "content",
                    SectionBody::Tabs {
                        tabs: vec![
                            Tab { id: "first".into(), label: "First".into(), cards: vec![] },
                            Tab { id: "second".into(), label: "Second".into(), cards: vec![] },
                        ],
                    },
                ),
                Section::new("quiz", SectionBody::Quiz { questions: vec![] }),
            ],
        }
    }

    #[test]
    fn first_tab_follows_document_order() {
        let doc = doc_with_tabs();
        assert_eq!(doc.first_tab_id(), Some("first"));
    }

    #[test]
    fn quiz_section_is_found_by_body() {
        let doc = doc_with_tabs();
        assert_eq!(doc.quiz_section_id(), Some("quiz"));
    }

    #[test]
    fn points_default_when_metadata_absent() {
        let doc = doc_with_tabs();
        assert_eq!(doc.points_per_section(), DEFAULT_POINTS_PER_SECTION);
    }

    #[test]
    fn card_id_covers_all_variants() {
        let card = Card::Profile(ProfileCard {
            id: "p1".into(),
            name: "The Helper".into(),
            archetype: None,
            icon: None,
            accent: Accent::Green,
            body: None,
            pain: None,
            power: None,
            story: None,
        });
        assert_eq!(card.id(), Some("p1"));
        assert!(card.is_completable());

        let unknown = Card::Unknown { id: None, kind: "3d_card".into() };
        assert_eq!(unknown.id(), None);
        assert!(!unknown.is_completable());
    }

    #[test]
    fn accent_from_token_and_style_hint() {
        assert_eq!(Accent::from_hint("green"), Accent::Green);
        assert_eq!(Accent::from_hint("bg-green-100 text-green-800"), Accent::Green);
        assert_eq!(Accent::from_hint("bg-purple-100 text-purple-800"), Accent::Purple);
        assert_eq!(Accent::from_hint("chartreuse"), Accent::Neutral);
    }
}
