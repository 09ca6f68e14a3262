//! Memento `Link` header parsing.
//!
//! The Wayback Machine describes the neighbourhood of a capture with a `Link`
//! header of the form `<url1>; rel="...", <url2>; rel="...", ...`. Matching is
//! done on the literal relation phrases the archive emits, so the relation
//! vocabulary it uses for one, two, and three or more captures is listed
//! explicitly in [`Relation`].

use serde::Serialize;
use std::collections::BTreeMap;

/// Capture URLs are picked out of a segment by this domain.
pub const ARCHIVE_DOMAIN: &str = "archive.org";

const SEGMENT_SEPARATOR: &str = ", <";
const FIELD_SEPARATOR: &str = "; ";

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Relation {
    First,
    Next,
    Last,
    FirstLast,
    NextLast,
    PrevLast,
    PrevFirst,
}

impl Relation {
    /// Matching order. A segment takes the first relation whose phrase it contains.
    pub const ALL: [Self; 7] = [
        Self::First,
        Self::Next,
        Self::Last,
        Self::FirstLast,
        Self::NextLast,
        Self::PrevLast,
        Self::PrevFirst,
    ];

    pub fn phrase(self) -> &'static str {
        match self {
            Self::First => "rel=\"first memento\"",
            Self::Next => "rel=\"next memento\"",
            Self::Last => "rel=\"last memento\"",
            Self::FirstLast => "rel=\"first last memento\"",
            Self::NextLast => "rel=\"next last memento\"",
            Self::PrevLast => "rel=\"prev last memento\"",
            Self::PrevFirst => "rel=\"prev first memento\"",
        }
    }

    pub fn is_earliest(self) -> bool {
        matches!(self, Self::First | Self::FirstLast)
    }

    pub fn is_latest(self) -> bool {
        matches!(self, Self::Last | Self::NextLast)
    }

    fn find(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|relation| segment.contains(relation.phrase()))
    }
}

/// The earliest and latest capture URLs advertised by a `Link` header.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Boundaries {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

impl Boundaries {
    pub fn is_empty(&self) -> bool {
        self.earliest.is_none() && self.latest.is_none()
    }
}

/// Recognized relations from a single `Link` header, each mapped to its
/// normalized segment text.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Mementos {
    segments: BTreeMap<Relation, String>,
}

impl Mementos {
    pub fn parse(header: &str) -> Self {
        let mut segments = BTreeMap::new();

        for segment in header.split(SEGMENT_SEPARATOR) {
            let normalized = normalize(segment);

            if let Some(relation) = Relation::find(&normalized) {
                segments.insert(relation, normalized);
            }
        }

        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, relation: Relation) -> Option<&str> {
        self.segments.get(&relation).map(String::as_str)
    }

    pub fn url(&self, relation: Relation) -> Option<&str> {
        self.segment(relation).and_then(capture_url)
    }

    pub fn relations(&self) -> impl Iterator<Item = Relation> + '_ {
        self.segments.keys().copied()
    }

    pub fn earliest(&self) -> Option<&str> {
        self.boundary(Relation::is_earliest)
    }

    pub fn latest(&self) -> Option<&str> {
        self.boundary(Relation::is_latest)
    }

    pub fn boundaries(&self) -> Boundaries {
        Boundaries {
            earliest: self.earliest().map(str::to_string),
            latest: self.latest().map(str::to_string),
        }
    }

    fn boundary(&self, select: fn(Relation) -> bool) -> Option<&str> {
        self.segments
            .iter()
            .filter(|(relation, _)| select(**relation))
            .find_map(|(_, segment)| capture_url(segment))
    }
}

fn normalize(segment: &str) -> String {
    segment.trim().trim_start_matches('<').replace(">;", ";")
}

fn capture_url(segment: &str) -> Option<&str> {
    segment
        .split(FIELD_SEPARATOR)
        .find(|field| field.contains(ARCHIVE_DOMAIN))
}
