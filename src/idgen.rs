//! Base-N id generator.
//!
//! Ids are a positional counter written with a caller-supplied alphabet, so
//! with the digits alphabet the sequence reads `0, 1, ... 9, 10, 11, ...` and
//! with `ab` it reads `a, b, ba, bb, baa, ...`. The id length only grows when
//! the counter needs another position.

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

pub const DEFAULT_PREFIX: &str = "pp_";
pub const DEFAULT_ALPHABET: &str = "0123456789";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdOptions {
    pub prefix: String,
    pub suffix: String,
    pub alphabet: String,
}

impl Default for IdOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: String::new(),
            alphabet: DEFAULT_ALPHABET.to_string(),
        }
    }
}

impl IdOptions {
    pub fn validate(&self) -> Result<(), ScopeError> {
        check_alphabet(&self.alphabet)?;
        // Prefix is the start of a CSS identifier, so it cannot open with a digit.
        match self.prefix.chars().next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-' => Ok(()),
            _ => Err(ScopeError::InvalidPrefix(self.prefix.clone())),
        }
    }
}

fn check_alphabet(alphabet: &str) -> Result<Vec<char>, ScopeError> {
    let symbols: Vec<char> = alphabet.chars().collect();
    let invalid = |reason: &str| ScopeError::InvalidAlphabet {
        alphabet: alphabet.to_string(),
        reason: reason.to_string(),
    };

    if symbols.len() < 2 {
        return Err(invalid("needs at least two symbols"));
    }
    for (i, c) in symbols.iter().enumerate() {
        if symbols[..i].contains(c) {
            return Err(invalid(&format!("symbol {:?} appears twice", c)));
        }
        if c.is_whitespace() {
            return Err(invalid("whitespace is not allowed"));
        }
    }
    Ok(symbols)
}

#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    suffix: String,
    symbols: Vec<char>,
    counter: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: String::new(),
            symbols: DEFAULT_ALPHABET.chars().collect(),
            counter: 0,
        }
    }
}

impl IdGenerator {
    pub fn new(options: &IdOptions) -> Result<Self, ScopeError> {
        options.validate()?;
        Ok(Self {
            prefix: options.prefix.clone(),
            suffix: options.suffix.clone(),
            symbols: check_alphabet(&options.alphabet)?,
            counter: 0,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }

    /// The id the next call to [`IdGenerator::next_id`] will return.
    pub fn peek(&self) -> String {
        self.format(self.counter)
    }

    pub fn next_id(&mut self) -> String {
        let id = self.format(self.counter);
        self.counter += 1;
        id
    }

    fn format(&self, value: u64) -> String {
        let mut id = String::with_capacity(self.prefix.len() + self.suffix.len() + 4);
        id.push_str(&self.prefix);
        id.push_str(&encode(value, &self.symbols));
        id.push_str(&self.suffix);
        id
    }
}

/// Positional encoding of `value` using `symbols` as digits.
pub fn encode(mut value: u64, symbols: &[char]) -> String {
    let base = symbols.len() as u64;
    let mut digits = Vec::new();
    loop {
        digits.push(symbols[(value % base) as usize]);
        value /= base;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().collect()
}
