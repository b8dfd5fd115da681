use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Lower-cases and trims a skill name, collapsing interior whitespace runs.
pub fn canonicalize(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

fn display_form(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A skill name with its canonical comparison key and the form shown to users.
///
/// Equality, hashing and ordering only consider the canonical form, so
/// `"  react "` and `"React"` are the same skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Skill {
    canonical: String,
    display: String,
}

impl Skill {
    pub fn parse(name: &str) -> Result<Self, MatchError> {
        let display = display_form(name);
        if display.is_empty() {
            return Err(MatchError::InvalidInput(
                "skill name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            canonical: display.to_lowercase(),
            display,
        })
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

impl PartialEq for Skill {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Skill {}

impl Hash for Skill {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for Skill {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Skill {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl TryFrom<String> for Skill {
    type Error = MatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Skill::parse(&value)
    }
}

impl From<Skill> for String {
    fn from(value: Skill) -> Self {
        value.display
    }
}

/// Skills unique under canonicalization.
///
/// Insertion order is kept for display; equality ignores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Skill>", into = "Vec<Skill>")]
pub struct SkillSet {
    ordered: Vec<Skill>,
    index: HashSet<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every name, failing on the first empty one. Duplicates collapse.
    pub fn from_names<I, S>(names: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(Skill::parse(name.as_ref())?);
        }
        Ok(set)
    }

    /// Returns `false` when an equivalent skill was already present.
    pub fn insert(&mut self, skill: Skill) -> bool {
        if !self.index.insert(skill.canonical.clone()) {
            return false;
        }
        self.ordered.push(skill);
        true
    }

    pub fn remove(&mut self, skill: &Skill) -> bool {
        if !self.index.remove(&skill.canonical) {
            return false;
        }
        self.ordered.retain(|existing| existing != skill);
        true
    }

    pub fn contains(&self, skill: &Skill) -> bool {
        self.index.contains(&skill.canonical)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.index.contains(&canonicalize(name))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Skill> {
        self.ordered.iter()
    }

    pub fn display_names(&self) -> Vec<String> {
        self.ordered
            .iter()
            .map(|skill| skill.display.clone())
            .collect()
    }

    pub fn is_subset(&self, other: &SkillSet) -> bool {
        self.index.iter().all(|key| other.index.contains(key))
    }
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for SkillSet {}

impl FromIterator<Skill> for SkillSet {
    fn from_iter<T: IntoIterator<Item = Skill>>(iter: T) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

impl From<Vec<Skill>> for SkillSet {
    fn from(value: Vec<Skill>) -> Self {
        value.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<Skill> {
    fn from(value: SkillSet) -> Self {
        value.ordered
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = &'a Skill;
    type IntoIter = std::slice::Iter<'a, Skill>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter()
    }
}
