//! Canonical skill vocabulary backing autocomplete and suggestion chips.

use std::collections::HashSet;

use crate::catalog::JobCatalog;
use crate::error::MatchError;
use crate::skills::{Skill, SkillSet};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 20;

/// Skills offered to users before they type anything, in display priority order.
pub const SEED_SKILLS: &[&str] = &[
    "Python",
    "TypeScript",
    "AWS",
    "Docker",
    "MongoDB",
    "GraphQL",
    "Vue.js",
    "Angular",
    "Kubernetes",
    "Redis",
    "PostgreSQL",
    "Git",
    "CI/CD",
    "Machine Learning",
    "TensorFlow",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    Exact,
    Prefix,
    Substring,
}

#[derive(Debug, Clone)]
pub struct SkillRegistry {
    vocabulary: Vec<Skill>,
    seeded: usize,
    limit: usize,
}

impl SkillRegistry {
    /// Builds a vocabulary from `seed` followed by `extra`; the first display form of a
    /// canonical name wins.
    pub fn new<'a, I>(seed: &[&str], extra: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = &'a Skill>,
    {
        let mut seen = HashSet::new();
        let mut vocabulary = Vec::new();

        for name in seed {
            if let Ok(skill) = Skill::parse(name) {
                if seen.insert(skill.canonical().to_string()) {
                    vocabulary.push(skill);
                }
            }
        }
        let seeded = vocabulary.len();

        for skill in extra {
            if seen.insert(skill.canonical().to_string()) {
                vocabulary.push(skill.clone());
            }
        }

        Self {
            vocabulary,
            seeded,
            limit: limit.max(1),
        }
    }

    /// Seed vocabulary merged with every skill the catalog requires.
    pub fn from_catalog(catalog: &JobCatalog, limit: usize) -> Self {
        Self::new(SEED_SKILLS, catalog.skills(), limit)
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    pub fn contains(&self, skill: &Skill) -> bool {
        self.vocabulary.iter().any(|known| known == skill)
    }

    /// Case-insensitive completion of `prefix`.
    ///
    /// Exact matches rank first, then prefix matches, then substring matches; each tier is
    /// sorted lexicographically. At most `limit` skills are returned.
    pub fn suggest(&self, prefix: &str, excluding: &SkillSet) -> Result<Vec<Skill>, MatchError> {
        let needle = crate::skills::canonicalize(prefix);
        if needle.is_empty() {
            return Err(MatchError::InvalidInput(
                "suggestion prefix must not be empty".to_string(),
            ));
        }

        let mut ranked: Vec<(MatchTier, &Skill)> = self
            .vocabulary
            .iter()
            .filter(|skill| !excluding.contains(skill))
            .filter_map(|skill| tier_for(skill.canonical(), &needle).map(|tier| (tier, skill)))
            .collect();

        ranked.sort_by(|(left_tier, left), (right_tier, right)| {
            left_tier
                .cmp(right_tier)
                .then_with(|| left.canonical().cmp(right.canonical()))
                .then_with(|| left.display().cmp(right.display()))
        });

        Ok(ranked
            .into_iter()
            .take(self.limit)
            .map(|(_, skill)| skill.clone())
            .collect())
    }

    /// The first `count` seed skills the user does not have yet, in seed order.
    pub fn featured(&self, excluding: &SkillSet, count: usize) -> Vec<Skill> {
        self.vocabulary[..self.seeded]
            .iter()
            .filter(|skill| !excluding.contains(skill))
            .take(count)
            .cloned()
            .collect()
    }
}

fn tier_for(candidate: &str, needle: &str) -> Option<MatchTier> {
    if candidate == needle {
        Some(MatchTier::Exact)
    } else if candidate.starts_with(needle) {
        Some(MatchTier::Prefix)
    } else if candidate.contains(needle) {
        Some(MatchTier::Substring)
    } else {
        None
    }
}
