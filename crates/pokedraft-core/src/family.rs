// Evolution family records as served by the evolution-chain catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest evolution-chain id in the catalog snapshot this app was built
/// against. Needs bumping when new chains are published.
pub const FAMILY_COUNT: u32 = 476;

/// Catalog identifier of one evolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub u32);

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `{ name, url }` reference to another catalog resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One stage of an evolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    /// Next stages. The catalog allows several (branching evolutions); only
    /// the first one is ever followed here.
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

impl ChainLink {
    /// Build a single stage with no further evolutions.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            species: NamedResource {
                name: name.into(),
                url: String::new(),
            },
            evolves_to: Vec::new(),
        }
    }

    /// Build a linear chain from a list of species names, root first.
    ///
    /// Returns `None` for an empty list.
    pub fn linear<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        let mut iter = names.iter().rev();
        let mut link = ChainLink::leaf(iter.next()?.as_ref());
        for name in iter {
            let mut parent = ChainLink::leaf(name.as_ref());
            parent.evolves_to.push(link);
            link = parent;
        }
        Some(link)
    }

    pub fn name(&self) -> &str {
        &self.species.name
    }
}

/// A fetched evolution family: its catalog id and the root of its chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    pub chain: ChainLink,
}

impl Family {
    pub fn new(id: FamilyId, chain: ChainLink) -> Self {
        Self { id, chain }
    }

    /// Species name of the base (unevolved) stage.
    pub fn root_name(&self) -> &str {
        self.chain.name()
    }

    /// The most-evolved stage, reached by repeatedly taking the first
    /// `evolves_to` entry until none remains.
    pub fn final_stage(&self) -> &ChainLink {
        let mut link = &self.chain;
        while let Some(next) = link.evolves_to.first() {
            link = next;
        }
        link
    }

    /// Display name of the most-evolved stage.
    pub fn final_display_name(&self) -> String {
        display_name(self.final_stage().name())
    }

    /// Species names along the followed path, root first.
    pub fn stage_names(&self) -> Vec<&str> {
        let mut names = vec![self.chain.name()];
        let mut link = &self.chain;
        while let Some(next) = link.evolves_to.first() {
            names.push(next.name());
            link = next;
        }
        names
    }
}

/// Format a catalog species name for display: hyphens become spaces and
/// every word is title-cased (`"mr-mime"` -> `"Mr Mime"`).
pub fn display_name(name: &str) -> String {
    name.replace('-', " ")
        .split(' ')
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
