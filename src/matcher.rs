//! Offline fuzzy matching of free-text questions against the catalog.
//!
//! Every entry accumulates a score from three signals:
//!
//! - **direct**: the normalized query contains one of the entry's normalized
//!   key phrases (once per key);
//! - **partial**: a query token and a key phrase contain one another, in
//!   either direction (once per key and token occurrence, so repeated words
//!   count again);
//! - **stem**: a query token fires a stem rule whose topic appears inside one
//!   of the entry's key phrases (at most once per token occurrence and entry).
//!
//! The highest total wins, earlier entries win ties, and a winner below
//! [`Weights::min_score`] is discarded.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogEntry},
    error::{Error, Result},
    stems::StemDictionary,
    text_util::{normalize, tokenize},
};

pub const DEFAULT_DIRECT_WEIGHT: u32 = 3;
pub const DEFAULT_PARTIAL_WEIGHT: u32 = 1;
pub const DEFAULT_STEM_WEIGHT: u32 = 2;
pub const DEFAULT_MIN_SCORE: u32 = 3;
pub const DEFAULT_STEM_PREFIX_LEN: usize = 5;

/// Smallest usable prefix length; shorter prefixes than the shortest token
/// would let almost every word fire some rule.
pub const MIN_STEM_PREFIX_LEN: usize = 3;

/// Upper bound for every weight and the threshold.
pub const MAX_WEIGHT: u32 = 1000;

/// Scoring weights and the confidence threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    pub direct: u32,
    pub partial: u32,
    pub stem: u32,
    pub min_score: u32,
    pub stem_prefix_len: usize,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            direct: DEFAULT_DIRECT_WEIGHT,
            partial: DEFAULT_PARTIAL_WEIGHT,
            stem: DEFAULT_STEM_WEIGHT,
            min_score: DEFAULT_MIN_SCORE,
            stem_prefix_len: DEFAULT_STEM_PREFIX_LEN,
        }
    }
}

impl Weights {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("weight.direct", self.direct),
            ("weight.partial", self.partial),
            ("weight.stem", self.stem),
            ("min_score", self.min_score),
        ] {
            if value > MAX_WEIGHT {
                return Err(Error::Config(format!(
                    "{name} must be at most {MAX_WEIGHT}, got {value}"
                )));
            }
        }
        if self.min_score == 0 {
            return Err(Error::Config(
                "min_score must be at least 1".to_string(),
            ));
        }
        if self.stem_prefix_len < MIN_STEM_PREFIX_LEN {
            return Err(Error::Config(format!(
                "stem_prefix_len must be at least {MIN_STEM_PREFIX_LEN}"
            )));
        }
        Ok(())
    }
}

/// Result of matching a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
    Match(&'a CatalogEntry),
    NoMatch,
}

impl<'a> MatchOutcome<'a> {
    pub fn entry(self) -> Option<&'a CatalogEntry> {
        match self {
            MatchOutcome::Match(entry) => Some(entry),
            MatchOutcome::NoMatch => None,
        }
    }

    pub fn is_match(self) -> bool {
        matches!(self, MatchOutcome::Match(_))
    }
}

/// Score contributions for one catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryScore {
    pub direct: u32,
    pub partial: u32,
    pub stem: u32,
}

impl EntryScore {
    pub fn total(&self) -> u32 {
        self.direct
            .saturating_add(self.partial)
            .saturating_add(self.stem)
    }
}

/// Full scoring trace for one query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreCard {
    pub normalized: String,
    pub tokens: Vec<String>,
    /// One score per catalog entry, in catalog order.
    pub scores: Vec<EntryScore>,
    /// Index of the highest scoring entry, if any scored above zero.
    pub best: Option<usize>,
    /// Whether the best entry reached the confidence threshold.
    pub confident: bool,
}

impl ScoreCard {
    pub fn best_score(&self) -> u32 {
        self.best.map_or(0, |idx| self.scores[idx].total())
    }
}

/// Scores queries against a catalog and stem dictionary.
///
/// Holds only borrowed, read-only data, so a single matcher can serve
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    catalog: &'a Catalog,
    stems: &'a StemDictionary,
    weights: Weights,
    /// For each stem rule, the catalog entries whose keys contain its topic.
    rule_entries: Vec<Vec<usize>>,
}

impl<'a> Matcher<'a> {
    pub fn new(
        catalog: &'a Catalog,
        stems: &'a StemDictionary,
        weights: Weights,
    ) -> Self {
        let rule_entries: Vec<Vec<usize>> = stems
            .rules()
            .iter()
            .map(|rule| {
                (0..catalog.len())
                    .filter(|&idx| {
                        catalog
                            .normalized_keys(idx)
                            .iter()
                            .any(|key| key.contains(rule.topic.as_str()))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self {
            catalog,
            stems,
            weights,
            rule_entries,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Score every catalog entry for `query`.
    pub fn scores(&self, query: &str) -> ScoreCard {
        let normalized = normalize(query);
        let tokens: Vec<String> =
            tokenize(&normalized).into_iter().map(str::to_string).collect();
        let mut scores = vec![EntryScore::default(); self.catalog.len()];

        if !tokens.is_empty() {
            self.score_keys(&normalized, &tokens, &mut scores);
            self.score_stems(&tokens, &mut scores);
        }

        let mut best = None;
        let mut best_total = 0;
        for (idx, score) in scores.iter().enumerate() {
            if score.total() > best_total {
                best_total = score.total();
                best = Some(idx);
            }
        }

        ScoreCard {
            normalized,
            tokens,
            scores,
            best,
            confident: best.is_some() && best_total >= self.weights.min_score,
        }
    }

    /// Return the confidently matched entry, if any.
    pub fn find(&self, query: &str) -> MatchOutcome<'a> {
        let card = self.scores(query);

        if card.tokens.is_empty() {
            debug!("query has no usable words");
            return MatchOutcome::NoMatch;
        }

        match card.best {
            Some(idx) if card.confident => {
                let entry = &self.catalog.entries()[idx];
                debug!(
                    title = %entry.title,
                    score = card.best_score(),
                    "offline match"
                );
                MatchOutcome::Match(entry)
            }
            _ => {
                debug!(
                    best_score = card.best_score(),
                    min_score = self.weights.min_score,
                    "no confident offline match"
                );
                MatchOutcome::NoMatch
            }
        }
    }

    fn score_keys(
        &self,
        normalized: &str,
        tokens: &[String],
        scores: &mut [EntryScore],
    ) {
        for (idx, score) in scores.iter_mut().enumerate() {
            for key in self.catalog.normalized_keys(idx) {
                if normalized.contains(key.as_str()) {
                    score.direct =
                        score.direct.saturating_add(self.weights.direct);
                }
                for token in tokens {
                    if key.contains(token.as_str())
                        || token.contains(key.as_str())
                    {
                        score.partial =
                            score.partial.saturating_add(self.weights.partial);
                    }
                }
            }
        }
    }

    fn score_stems(&self, tokens: &[String], scores: &mut [EntryScore]) {
        let mut hit = vec![false; scores.len()];

        for token in tokens {
            hit.fill(false);
            for (rule, entries) in self.stems.rules().iter().zip(&self.rule_entries)
            {
                if entries.is_empty()
                    || !rule.fires(token, self.weights.stem_prefix_len)
                {
                    continue;
                }
                for &idx in entries {
                    hit[idx] = true;
                }
            }
            for (score, &h) in scores.iter_mut().zip(&hit) {
                if h {
                    score.stem = score.stem.saturating_add(self.weights.stem);
                }
            }
        }
    }
}

/// One-shot match without keeping a [`Matcher`] around.
pub fn find_match<'a>(
    query: &str,
    catalog: &'a Catalog,
    stems: &'a StemDictionary,
    weights: Weights,
) -> Option<&'a CatalogEntry> {
    Matcher::new(catalog, stems, weights).find(query).entry()
}
