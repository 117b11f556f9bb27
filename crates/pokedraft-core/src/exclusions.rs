// Species that may never head a drafted family.

use std::collections::HashSet;
use std::fmt;

/// Restricted legendaries.
pub const RESTRICTED: &[&str] = &[
    "mewtwo", "lugia", "ho-oh", "kyogre", "groudon", "rayquaza", "dialga", "palkia", "giratina",
    "reshiram", "zekrom", "kyurem", "xerneas", "yveltal", "zygarde", "cosmog", "cosmoem",
    "solgaleo", "lunala", "necrozma", "zacian", "zamazenta", "eternatus", "calyrex",
];

/// Mythical species.
pub const MYTHICAL: &[&str] = &[
    "mew", "celebi", "jirachi", "deoxys", "phione", "darkrai", "shaymin", "arceus", "victini",
    "keldeo", "meloetta", "genesect", "diancie", "hoopa", "volcanion", "magearna", "marshadow",
    "zeraora", "meltan", "melmetal", "zarude",
];

/// Neither restricted nor mythical, but unfit for a draft anyway.
pub const DISALLOWED: &[&str] = &["unown"];

/// Which list a species was rejected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionKind {
    Restricted,
    Mythical,
    Disallowed,
}

impl fmt::Display for ExclusionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExclusionKind::Restricted => "restricted",
            ExclusionKind::Mythical => "mythical",
            ExclusionKind::Disallowed => "disallowed",
        };
        f.write_str(s)
    }
}

/// Read-only exclusion sets, built once and shared between requests.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    restricted: HashSet<String>,
    mythical: HashSet<String>,
    disallowed: HashSet<String>,
}

impl Exclusions {
    pub fn new<R, M, D>(restricted: R, mythical: M, disallowed: D) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            restricted: restricted.into_iter().map(Into::into).collect(),
            mythical: mythical.into_iter().map(Into::into).collect(),
            disallowed: disallowed.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in lists.
    pub fn standard() -> Self {
        Self::new(
            RESTRICTED.iter().copied(),
            MYTHICAL.iter().copied(),
            DISALLOWED.iter().copied(),
        )
    }

    /// Return the list that excludes `root_species`, if any.
    pub fn check(&self, root_species: &str) -> Option<ExclusionKind> {
        if self.restricted.contains(root_species) {
            Some(ExclusionKind::Restricted)
        } else if self.mythical.contains(root_species) {
            Some(ExclusionKind::Mythical)
        } else if self.disallowed.contains(root_species) {
            Some(ExclusionKind::Disallowed)
        } else {
            None
        }
    }

    pub fn is_excluded(&self, root_species: &str) -> bool {
        self.check(root_species).is_some()
    }
}
