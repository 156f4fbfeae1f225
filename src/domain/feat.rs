use std::{convert::Infallible, fmt, str::FromStr};

use serde::Serialize;

/// The category of a prerequisite, the first token of a `NEEDSALL` or
/// `NEEDSONE` item.
///
/// Kinds are free-form in the planner data. The graph builder only treats a
/// handful specially, so those get their own variants and everything else is
/// kept verbatim in [`DependencyKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Another feat, e.g. `Feat Power Attack`.
    Feat,
    /// An epic feat. The token carries its own colon, e.g. `Epic: Blinding
    /// Speed`.
    Epic,
    /// A minimum ability score, e.g. `Ability Dexterity 17`.
    Ability,
    /// A class level, e.g. `Class Rogue 4`.
    Class,
    /// A race, e.g. `Race Warforged`.
    Race,
    /// Any other kind, such as `BAB`.
    Other(String),
}

impl DependencyKind {
    /// The token as it appears in the data file.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Feat => "Feat",
            Self::Epic => "Epic:",
            Self::Ability => "Ability",
            Self::Class => "Class",
            Self::Race => "Race",
            Self::Other(kind) => kind,
        }
    }

    /// Whether the dependency refers to another feat, and so gets a node of its
    /// own in the graph.
    #[must_use]
    pub const fn is_feat(&self) -> bool {
        matches!(self, Self::Feat | Self::Epic)
    }

    /// Whether the target is meaningful on its own as a graph label.
    ///
    /// Other kinds are prefixed with the kind token, so that `BAB 11` never
    /// collides with a feat of the same name.
    #[must_use]
    pub const fn is_self_describing(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for DependencyKind {
    fn from(token: &str) -> Self {
        match token {
            "Feat" => Self::Feat,
            "Epic:" => Self::Epic,
            "Ability" => Self::Ability,
            "Class" => Self::Class,
            "Race" => Self::Race,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for DependencyKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DependencyKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single prerequisite of a feat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
    /// What sort of thing is required.
    pub kind: DependencyKind,
    /// The name of the required thing.
    pub target: String,
}

impl Dependency {
    /// Creates a dependency from its kind token and target.
    #[must_use]
    pub fn new(kind: &str, target: impl Into<String>) -> Self {
        Self {
            kind: DependencyKind::from(kind),
            target: target.into(),
        }
    }

    /// The label this dependency is drawn with in the graph.
    ///
    /// This is the bare target for feats, abilities, classes and races, and
    /// the kind token glued to the target for anything else (`BAB11`).
    #[must_use]
    pub fn label(&self) -> String {
        if self.kind.is_self_describing() {
            self.target.clone()
        } else {
            format!("{}{}", self.kind, self.target)
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.target)
    }
}

/// A feat and its prerequisites, as parsed from one record of the feats file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feat {
    /// The feat's own name (`FEATNAME`).
    pub name: String,

    /// The heading the feat is grouped under (`PARENTHEADING`), for feats
    /// such as `Weapon Focus: Slashing Weapons`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_heading: Option<String>,

    /// Prerequisites which must all be met (`NEEDSALL`).
    pub required_deps: Vec<Dependency>,

    /// Prerequisites of which any one is enough (`NEEDSONE`).
    pub alternative_deps: Vec<Dependency>,

    /// Whether the feat is granted automatically rather than trained.
    pub automatic: bool,
}

impl Feat {
    /// The name including the parent heading, if there is one.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.parent_heading {
            Some(parent) => format!("{parent}: {}", self.name),
            None => self.name.clone(),
        }
    }

    /// Names of the feats this feat requires.
    #[must_use]
    pub fn feat_deps(&self) -> Vec<&str> {
        self.required_deps
            .iter()
            .filter(|dep| dep.kind == DependencyKind::Feat)
            .map(|dep| dep.target.as_str())
            .collect()
    }

    /// Whether the feat has any prerequisites at all.
    #[must_use]
    pub fn has_deps(&self) -> bool {
        !self.required_deps.is_empty() || !self.alternative_deps.is_empty()
    }
}
