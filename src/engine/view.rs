//! View-model rendering
//!
//! `render` turns a normalized document plus progress and interaction state
//! into a [`ViewTree`]: plain data the UI shell can draw without knowing
//! anything about schemas or gamification rules. Dispatch over section and
//! card variants is exhaustive; the unknown variants land in a single
//! placeholder arm instead of vanishing.

use crate::engine::sequencer::{self, FlatItem};
use crate::engine::state::LessonState;
use crate::lesson::model::{
    Accent, Card, ExerciseCard, FooterLink, LessonDocument, MediaKind, NavItem, QuizQuestion,
    Section, SectionBody, Tab,
};
use crate::progress::{ProgressSnapshot, ProgressStore};

/// Default label for an uncompleted activity's button
const MARK_COMPLETE: &str = "Mark as complete";
/// Label once an activity is completed; the button is disabled from then on
const COMPLETED: &str = "Completed";

/// Everything the shell needs to draw one frame of a lesson
#[derive(Debug, Clone)]
pub struct ViewTree {
    pub dashboard: Option<DashboardView>,
    pub sections: Vec<SectionView>,
}

/// Gamification header: progress bar, points, badges
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub title: String,
    pub subtitle: Option<String>,
    pub progress_label: Option<String>,
    pub certificate: Option<(String, String)>,
    pub snapshot: ProgressSnapshot,
    pub total: usize,
    /// Earned badges only, in table order
    pub badges: Vec<BadgeView>,
}

#[derive(Debug, Clone)]
pub struct BadgeView {
    pub label: String,
    pub icon: String,
    pub accent: Accent,
}

/// One rendered section
#[derive(Debug, Clone)]
pub enum SectionView {
    Intro {
        id: String,
        title: Option<String>,
        subtitle: Option<String>,
        paragraphs: Vec<String>,
    },
    Navigation {
        id: String,
        title: Option<String>,
        items: Vec<NavItem>,
    },
    Multimedia {
        id: String,
        cards: Vec<CardView>,
    },
    Tabs {
        id: String,
        strip: Vec<TabStripItem>,
        /// Cards of the active tab only; inactive tabs are not mounted
        cards: Vec<CardView>,
    },
    Expandable {
        id: String,
        title: Option<String>,
        expanded: bool,
        cards: Vec<CardView>,
    },
    Exercise {
        id: String,
        title: Option<String>,
        subtitle: Option<String>,
        card: CardView,
    },
    Quiz {
        id: String,
        title: Option<String>,
        questions: Vec<QuestionView>,
        result: Option<String>,
    },
    Footer {
        id: String,
        title: Option<String>,
        subtitle: Option<String>,
        snapshot: ProgressSnapshot,
        total: usize,
        /// Show the congratulations banner at 100%
        celebrate: bool,
        links: Vec<FooterLink>,
        copyright: Option<String>,
    },
    /// Inert placeholder for a section type this player does not know
    Unsupported {
        id: String,
        kind: String,
    },
}

/// One entry in the tab strip
#[derive(Debug, Clone)]
pub struct TabStripItem {
    pub id: String,
    pub label: String,
    pub active: bool,
}

/// Visual family of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    Basic,
    Highlight,
    Profile,
    Alert,
    Exercise,
    Quiz,
    Audio,
    Video,
    Unsupported,
}

/// Styled body line primitives the shell knows how to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLine {
    /// Prose with inline `**bold**` markup
    Text(String),
    /// Emphasized one-liner
    Emphasis(String),
    Bullet(String),
    Step(usize, String),
    /// Labeled field, e.g. profile traits
    Field(String, String),
    Quote(String),
    /// Scratch input with placeholder and current value
    Input { placeholder: String, value: String },
}

/// View model for one card or multimedia activity
#[derive(Debug, Clone)]
pub struct CardView {
    pub id: Option<String>,
    pub style: CardStyle,
    pub title: String,
    pub subtitle: Option<String>,
    pub accent: Accent,
    pub body: Vec<CardLine>,
    pub completable: bool,
    pub completed: bool,
    /// Completion button label; the button is disabled once completed
    pub button_label: String,
    /// Offer the "go to next" action. Structural: never set on the last
    /// completable item of a container.
    pub show_next: bool,
    /// `Some` for disclosure cards (exercise), `None` otherwise
    pub expanded: Option<bool>,
    /// Transient scroll-target emphasis
    pub focused: bool,
}

/// Total activity count: the declared metadata value, else the flattened
/// completable-item count (deliberately not the raw section count, which
/// undercounts tabs).
pub fn total_activities(doc: &LessonDocument, order: &[FlatItem]) -> usize {
    doc.declared_total().unwrap_or(order.len())
}

/// Whether a completed activity should offer "go to next": it must sit in
/// the flatten order (expandable-section cards do not) and not be the last
/// item of its container.
fn offers_next(order: &[FlatItem], id: &str) -> bool {
    order.iter().any(|item| item.id == id) && !sequencer::is_last_in_container(order, id)
}

/// Render the full view tree for one frame
pub fn render(doc: &LessonDocument, store: &ProgressStore, state: &LessonState) -> ViewTree {
    let order = sequencer::flatten(doc);
    let total = total_activities(doc, &order);
    let snapshot = store.snapshot(total, doc.points_per_section());

    let dashboard = doc.metadata.as_ref().map(|meta| {
        let earned = store.badges();
        DashboardView {
            title: meta.title.clone(),
            subtitle: meta.subtitle.clone(),
            progress_label: doc.header.as_ref().map(|h| h.progress_label.clone()),
            certificate: doc
                .header
                .as_ref()
                .and_then(|h| h.certificate.as_ref())
                .map(|c| (c.title.clone(), c.text.clone())),
            snapshot,
            total,
            badges: meta
                .gamification
                .badges
                .iter()
                .filter(|(key, _)| earned.contains(*key))
                .map(|(_, spec)| BadgeView {
                    label: spec.label.clone(),
                    icon: spec.icon.clone(),
                    accent: spec.accent,
                })
                .collect(),
        }
    });

    let sections = doc
        .sections
        .iter()
        .map(|section| render_section(section, store, state, &order, snapshot, total))
        .collect();

    ViewTree { dashboard, sections }
}

fn render_section(
    section: &Section,
    store: &ProgressStore,
    state: &LessonState,
    order: &[FlatItem],
    snapshot: ProgressSnapshot,
    total: usize,
) -> SectionView {
    let id = section.id.clone();
    match &section.body {
        SectionBody::Intro { paragraphs } => SectionView::Intro {
            id,
            title: section.title.clone(),
            subtitle: section.subtitle.clone(),
            paragraphs: paragraphs.clone(),
        },
        SectionBody::Navigation { items } => SectionView::Navigation {
            id,
            title: section.title.clone(),
            items: items.clone(),
        },
        SectionBody::Multimedia { items } => SectionView::Multimedia {
            id,
            cards: items.iter().map(|item| media_view(item, store, state, order)).collect(),
        },
        SectionBody::Tabs { tabs } => render_tabs(id, tabs, store, state, order),
        SectionBody::Expandable { cards } => SectionView::Expandable {
            expanded: state.disclosure.is_section_expanded(&id),
            cards: cards.iter().map(|c| card_view(c, store, state, order)).collect(),
            title: section.title.clone(),
            id,
        },
        SectionBody::Exercise { card } => SectionView::Exercise {
            card: exercise_view(card, store, state, order),
            title: section.title.clone(),
            subtitle: section.subtitle.clone(),
            id,
        },
        SectionBody::Quiz { questions } => SectionView::Quiz {
            questions: questions.iter().map(|q| question_view(q, state)).collect(),
            result: state.quiz.result.map(|r| r.message()),
            title: section.title.clone(),
            id,
        },
        SectionBody::Footer { links, copyright } => SectionView::Footer {
            title: section.title.clone(),
            subtitle: section.subtitle.clone(),
            snapshot,
            total,
            celebrate: total > 0 && snapshot.completed_count >= total,
            links: links.clone(),
            copyright: copyright.clone(),
            id,
        },
        SectionBody::Unknown { kind } => SectionView::Unsupported { id, kind: kind.clone() },
    }
}

fn render_tabs(
    id: String,
    tabs: &[Tab],
    store: &ProgressStore,
    state: &LessonState,
    order: &[FlatItem],
) -> SectionView {
    // Exactly one tab active at a time; fall back to the first when the
    // state has not picked one yet
    let active_id = state
        .active_tab
        .as_deref()
        .filter(|a| tabs.iter().any(|t| t.id == *a))
        .or_else(|| tabs.first().map(|t| t.id.as_str()));

    let strip = tabs
        .iter()
        .map(|tab| TabStripItem {
            id: tab.id.clone(),
            label: tab.label.clone(),
            active: Some(tab.id.as_str()) == active_id,
        })
        .collect();

    let cards = tabs
        .iter()
        .find(|t| Some(t.id.as_str()) == active_id)
        .map(|tab| tab.cards.iter().map(|c| card_view(c, store, state, order)).collect())
        .unwrap_or_default();

    SectionView::Tabs { id, strip, cards }
}

fn media_view(
    item: &crate::lesson::model::MultimediaItem,
    store: &ProgressStore,
    state: &LessonState,
    order: &[FlatItem],
) -> CardView {
    let completed = store.is_completed(&item.id);
    let mut body = Vec::new();
    if let Some(subtitle) = &item.subtitle {
        body.push(CardLine::Text(subtitle.clone()));
    }
    if !item.url.is_empty() {
        body.push(CardLine::Field("Media".into(), item.url.clone()));
    }

    CardView {
        style: match item.kind {
            MediaKind::Audio => CardStyle::Audio,
            MediaKind::Video => CardStyle::Video,
        },
        title: item.title.clone(),
        subtitle: None,
        accent: match item.kind {
            MediaKind::Audio => Accent::Blue,
            MediaKind::Video => Accent::Green,
        },
        body,
        completable: true,
        completed,
        button_label: button_label(completed, item.button_text.as_deref()),
        show_next: completed && offers_next(order, &item.id),
        expanded: None,
        focused: state.focus.target() == Some(item.id.as_str()),
        id: Some(item.id.clone()),
    }
}

fn card_view(card: &Card, store: &ProgressStore, state: &LessonState, order: &[FlatItem]) -> CardView {
    let completed = card.id().map(|id| store.is_completed(id)).unwrap_or(false);
    let focused = card.id().is_some() && card.id() == state.focus.target();
    let show_next =
        completed && card.id().is_some_and(|id| offers_next(order, id));

    match card {
        Card::Basic(c) | Card::Highlight(c) => CardView {
            id: Some(c.id.clone()),
            style: if matches!(card, Card::Highlight(_)) {
                CardStyle::Highlight
            } else {
                CardStyle::Basic
            },
            title: c.title.clone().unwrap_or_default(),
            subtitle: None,
            accent: c.accent,
            body: vec![CardLine::Text(c.text.clone())],
            completable: true,
            completed,
            button_label: button_label(completed, c.button_text.as_deref()),
            show_next,
            expanded: None,
            focused,
        },
        Card::Profile(c) => {
            let mut body = Vec::new();
            if let Some(b) = &c.body {
                body.push(CardLine::Field("Body".into(), b.clone()));
            }
            if let Some(p) = &c.pain {
                body.push(CardLine::Field("Core pain".into(), p.clone()));
            }
            if let Some(p) = &c.power {
                body.push(CardLine::Field("Superpower".into(), p.clone()));
            }
            if let Some(s) = &c.story {
                body.push(CardLine::Quote(s.clone()));
            }
            CardView {
                id: Some(c.id.clone()),
                style: CardStyle::Profile,
                title: c.name.clone(),
                subtitle: c.archetype.clone(),
                accent: c.accent,
                body,
                completable: true,
                completed,
                button_label: button_label(completed, None),
                show_next,
                expanded: None,
                focused,
            }
        }
        Card::Alert(c) => {
            let mut body = Vec::new();
            if let Some(t) = &c.text {
                body.push(CardLine::Text(t.clone()));
            }
            body.extend(c.list.iter().cloned().map(CardLine::Bullet));
            if let Some(h) = &c.highlight {
                body.push(CardLine::Emphasis(h.clone()));
            }
            CardView {
                id: Some(c.id.clone()),
                style: CardStyle::Alert,
                title: c.title.clone().unwrap_or_default(),
                subtitle: c.subtitle.clone(),
                accent: Accent::Red,
                body,
                completable: true,
                completed,
                button_label: button_label(completed, c.button_text.as_deref()),
                show_next,
                expanded: None,
                focused,
            }
        }
        Card::Exercise(c) => exercise_view(c, store, state, order),
        Card::Quiz(c) => {
            let body = c
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| CardLine::Step(i + 1, q.question.clone()))
                .collect();
            CardView {
                id: Some(c.id.clone()),
                style: CardStyle::Quiz,
                title: "Quiz".into(),
                subtitle: None,
                accent: Accent::Amber,
                body,
                completable: true,
                completed,
                button_label: button_label(completed, None),
                show_next,
                expanded: None,
                focused,
            }
        }
        Card::Unknown { id, kind } => CardView {
            id: id.clone(),
            style: CardStyle::Unsupported,
            title: "Unsupported content".into(),
            subtitle: None,
            accent: Accent::Neutral,
            body: vec![CardLine::Text(format!(
                "This lesson uses a \"{kind}\" card this player does not understand."
            ))],
            completable: false,
            completed: false,
            button_label: String::new(),
            show_next: false,
            expanded: None,
            focused: false,
        },
    }
}

fn exercise_view(
    card: &ExerciseCard,
    store: &ProgressStore,
    state: &LessonState,
    order: &[FlatItem],
) -> CardView {
    let completed = store.is_completed(&card.id);
    let expanded = state.disclosure.is_card_expanded(&card.id);

    let mut body = Vec::new();
    if expanded {
        for (i, step) in card.instructions.iter().enumerate() {
            body.push(CardLine::Step(i + 1, step.clone()));
        }
        body.push(CardLine::Input {
            placeholder: card.placeholder.clone().unwrap_or_else(|| "Your notes...".into()),
            value: state.scratch.get(&card.id).cloned().unwrap_or_default(),
        });
    }

    CardView {
        id: Some(card.id.clone()),
        style: CardStyle::Exercise,
        title: card.title.clone(),
        subtitle: None,
        accent: Accent::Cyan,
        body,
        completable: true,
        completed,
        button_label: button_label(completed, card.button_text.as_deref()),
        show_next: completed && offers_next(order, &card.id),
        expanded: Some(expanded),
        focused: state.focus.target() == Some(card.id.as_str()),
    }
}

fn question_view(question: &QuizQuestion, state: &LessonState) -> QuestionView {
    QuestionView {
        id: question.id,
        question: question.question.clone(),
        options: question
            .options
            .iter()
            .map(|opt| OptionView {
                text: opt.clone(),
                selected: state.quiz.answers.get(&question.id).is_some_and(|a| a == opt),
            })
            .collect(),
    }
}

/// One rendered quiz question
#[derive(Debug, Clone)]
pub struct QuestionView {
    pub id: u32,
    pub question: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone)]
pub struct OptionView {
    pub text: String,
    pub selected: bool,
}

fn button_label(completed: bool, custom: Option<&str>) -> String {
    if completed {
        COMPLETED.to_string()
    } else {
        custom.unwrap_or(MARK_COMPLETE).to_string()
    }
}
