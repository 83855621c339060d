use std::{collections::BTreeSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    text_util::{char_prefix, normalize},
};

const BUNDLED_STEMS: &str = include_str!("../data/stems.json");

/// Maps a word fragment onto the topic token it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemRule {
    pub stem: String,
    pub topic: String,
}

impl StemRule {
    pub fn new(stem: &str, topic: &str) -> Self {
        Self {
            stem: stem.to_string(),
            topic: topic.to_string(),
        }
    }

    /// Whether a query token triggers this rule.
    ///
    /// Fires when the token contains the stem, or when the stem contains the
    /// first `prefix_len` characters of the token (short or truncated input).
    pub fn fires(&self, token: &str, prefix_len: usize) -> bool {
        if token.is_empty() {
            return false;
        }
        token.contains(self.stem.as_str())
            || self.stem.contains(char_prefix(token, prefix_len))
    }
}

/// Ordered, immutable stem table. Stems and topics are stored normalized.
#[derive(Debug, Clone)]
pub struct StemDictionary {
    rules: Vec<StemRule>,
}

impl StemDictionary {
    pub fn new(rules: Vec<StemRule>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let stem = normalize(&rule.stem);
                let topic = normalize(&rule.topic);
                if stem.is_empty() || topic.is_empty() {
                    return Err(Error::InvalidData(format!(
                        "stem rule {:?} -> {:?} normalizes to an empty string",
                        rule.stem, rule.topic
                    )));
                }
                Ok(StemRule { stem, topic })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// The stem table compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_STEMS)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Vec<StemRule> = serde_json::from_str(json)?;
        Self::new(rules)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn rules(&self) -> &[StemRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct topic tokens, sorted.
    pub fn topics(&self) -> BTreeSet<&str> {
        self.rules.iter().map(|r| r.topic.as_str()).collect()
    }
}
