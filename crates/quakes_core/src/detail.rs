//! Detail pane projection.
//!
//! Pure function of the visible quakes and the primary selection; holds no
//! state of its own.

use crate::model::quake::{Quake, QuakeId};
use std::fmt::{Display, Formatter};

/// Prompt shown when nothing (or a vanished quake) is selected.
pub const DETAIL_PLACEHOLDER: &str = "Select an earthquake";

/// Host layout width class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLayout {
    #[default]
    Compact,
    Wide,
}

/// Rendered content of the detail pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Placeholder(&'static str),
    Quake {
        code: QuakeId,
        magnitude: String,
        /// Location name, wide layouts only.
        location: Option<String>,
        /// Formatted date, wide layouts only.
        date: Option<String>,
    },
}

impl DetailView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

impl Display for DetailView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placeholder(prompt) => f.write_str(prompt),
            Self::Quake {
                magnitude,
                location,
                date,
                ..
            } => {
                write!(f, "M {magnitude}")?;
                if let Some(location) = location {
                    write!(f, " | {location}")?;
                }
                if let Some(date) = date {
                    write!(f, " | {date}")?;
                }
                Ok(())
            }
        }
    }
}

/// Projects the selected quake into the detail pane.
///
/// A selection that matches no quake in `quakes` renders the placeholder.
pub fn render_detail(
    quakes: &[Quake],
    selected: Option<&QuakeId>,
    layout: DetailLayout,
) -> DetailView {
    let Some(quake) = selected.and_then(|id| quakes.iter().find(|quake| &quake.code == id)) else {
        return DetailView::Placeholder(DETAIL_PLACEHOLDER);
    };

    let wide = layout == DetailLayout::Wide;
    DetailView::Quake {
        code: quake.code.clone(),
        magnitude: quake.magnitude_label(),
        location: wide.then(|| quake.location.name.clone()),
        date: wide.then(|| quake.full_date_label()),
    }
}
