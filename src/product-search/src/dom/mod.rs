//! Document abstraction the component renders into.
//!
//! The component never talks to a concrete DOM. A host implements
//! [`Document`] over whatever it has (a browser bridge, a webview, or the
//! bundled [`MemoryDocument`]) and forwards user interaction as [`DomEvent`]s.

mod memory;

pub use memory::{ElementSpec, MemoryDocument};

use std::fmt;
use std::str::FromStr;

use crate::config::SearchConfig;

/// Opaque handle to an element owned by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Handle returned when a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// A specific element
    Element(NodeId),
    /// The document itself
    Document,
}

/// Kind of event a listener observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Text value changed
    Input,
    /// Key pressed
    KeyDown,
    /// Pointer click
    Click,
    /// Pointer entered a descendant
    MouseOver,
}

/// Operations the component needs from the host document.
pub trait Document {
    /// Find an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Find the first element whose `name` attribute matches.
    fn element_by_name(&self, name: &str) -> Option<NodeId>;

    /// Current value of a form field.
    fn value(&self, node: NodeId) -> String;

    /// Set the value of a form field.
    fn set_value(&mut self, node: NodeId, value: &str);

    /// Replace the children of `node` with the given markup.
    fn set_inner_html(&mut self, node: NodeId, html: &str);

    /// Toggle the hidden state of `node`.
    fn set_hidden(&mut self, node: NodeId, hidden: bool);

    /// Add or remove `class` on row `row` of `container`.
    fn set_row_class(&mut self, container: NodeId, row: usize, class: &str, enabled: bool);

    /// Scroll row `row` of `container` into view.
    fn scroll_row_into_view(&mut self, container: NodeId, row: usize);

    /// Move keyboard focus to `node`.
    fn focus(&mut self, node: NodeId);

    /// Whether `target` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, target: NodeId) -> bool;

    /// Attach a listener.
    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);
}

/// Keys the navigator reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    /// Any other key, by DOM key name
    Other(String),
}

impl Key {
    /// Whether this is one of the keys whose default action is suppressed.
    pub fn is_navigation(&self) -> bool {
        !matches!(self, Key::Other(_))
    }
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        })
    }
}

/// An interaction forwarded by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// The query input's value changed; the component reads it back.
    Input,
    /// A key was pressed in the query input.
    KeyDown(Key),
    /// A click anywhere in the document.
    DocumentClick { target: NodeId },
    /// The pointer entered the row with this `data-index`.
    RowHover { index: usize },
    /// The row with this `data-index` was clicked.
    RowClick { index: usize },
}

/// What the host should do with the native event afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Let the browser run its default action.
    Default,
    /// Call `preventDefault` on the native event.
    PreventDefault,
}

/// The three elements the component cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    SearchInput,
    ResultsContainer,
    SelectedProductInput,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::SearchInput => write!(f, "search input"),
            Anchor::ResultsContainer => write!(f, "results container"),
            Anchor::SelectedProductInput => write!(f, "selected product input"),
        }
    }
}

/// An anchor that could not be located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAnchor {
    /// Which anchor
    pub anchor: Anchor,
    /// The id that was looked up
    pub id: String,
}

impl fmt::Display for MissingAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.anchor, self.id)
    }
}

/// Resolved anchor elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub search_input: NodeId,
    pub results_container: NodeId,
    pub selected_product_input: NodeId,
}

impl Anchors {
    /// Look up all three anchors, reporting every one that is missing.
    pub fn bind<D: Document + ?Sized>(
        document: &D,
        config: &SearchConfig,
    ) -> Result<Self, Vec<MissingAnchor>> {
        let lookups = [
            (Anchor::SearchInput, config.search_input_id.as_str()),
            (Anchor::ResultsContainer, config.results_container_id.as_str()),
            (
                Anchor::SelectedProductInput,
                config.selected_product_input_id.as_str(),
            ),
        ];

        let mut found = [None; 3];
        let mut missing = Vec::new();
        for (slot, (anchor, id)) in found.iter_mut().zip(lookups) {
            *slot = document.element_by_id(id);
            if slot.is_none() {
                missing.push(MissingAnchor {
                    anchor,
                    id: id.to_string(),
                });
            }
        }

        match found {
            [Some(search_input), Some(results_container), Some(selected_product_input)] => {
                Ok(Self {
                    search_input,
                    results_container,
                    selected_product_input,
                })
            }
            _ => Err(missing),
        }
    }
}
