//! Tokens and token identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which sentence of the pair a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Identity key of a token within its sentence.
///
/// Two tokens are the same entity iff text, 1-based occurrence index and
/// total occurrence count all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenRef {
    pub text: String,
    pub occurrence: u32,
    pub occurrences: u32,
}

impl TokenRef {
    pub fn new(text: impl Into<String>, occurrence: u32, occurrences: u32) -> Self {
        Self { text: text.into(), occurrence, occurrences }
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.text, self.occurrence, self.occurrences)
    }
}

/// A token as produced by the tokenizer: identity plus sentence position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// 1-based occurrence index of `text` in the sentence.
    pub occurrence: u32,
    /// Number of times `text` occurs in the sentence.
    pub occurrences: u32,
    /// 0-based position in the sentence.
    pub position: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, occurrence: u32, occurrences: u32, position: usize) -> Self {
        Self { text: text.into(), occurrence, occurrences, position }
    }

    pub fn token_ref(&self) -> TokenRef {
        TokenRef::new(self.text.clone(), self.occurrence, self.occurrences)
    }

    /// Tokenize pre-split words, computing occurrence counters.
    pub fn sentence<'w, I>(words: I) -> Vec<Token>
    where
        I: IntoIterator<Item = &'w str>,
    {
        let words: Vec<&str> = words.into_iter().collect();
        let mut seen: std::collections::HashMap<&str, u32> = std::collections::HashMap::new();
        words
            .iter()
            .enumerate()
            .map(|(position, &word)| {
                let occurrence = seen.entry(word).or_insert(0);
                *occurrence += 1;
                let occurrences = words.iter().filter(|&&w| w == word).count() as u32;
                Token::new(word, *occurrence, occurrences, position)
            })
            .collect()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A confidence-weighted edge between a source and a target token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLink {
    pub source: TokenRef,
    pub target: TokenRef,
    pub confidence: f64,
}

impl ScoredLink {
    pub fn new(source: TokenRef, target: TokenRef, confidence: f64) -> Self {
        Self { source, target, confidence }
    }
}
