//! Genome codec.
//!
//! A genome is a fixed-length bit string read in non-overlapping 4-bit
//! windows. Each window is looked up in a static 16-entry symbol table:
//!
//! | code          | symbol   |
//! |---------------|----------|
//! | `0001`–`1001` | `1`–`9`  |
//! | `1010`        | `+`      |
//! | `1011`        | `-`      |
//! | `1100`        | `*`      |
//! | `1101`        | `/`      |
//! | `0000`, `1110`, `1111` | unassigned |
//!
//! Decoding keeps only symbols that alternate operand / operator, starting
//! with an operand. Unassigned codes and out-of-turn symbols are skipped;
//! neither is an error.

use crate::error::{GaError, Result};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Bits per symbol window.
pub const SYMBOL_BITS: usize = 4;

/// Number of symbol windows in a default genome (300 bits).
pub const DEFAULT_SYMBOL_COUNT: usize = 75;

/// Arithmetic operator symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// The operator's 4-bit code.
    pub fn code(self) -> u8 {
        match self {
            Operator::Add => 0b1010,
            Operator::Sub => 0b1011,
            Operator::Mul => 0b1100,
            Operator::Div => 0b1101,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }
}

/// A decoded window: either an operand digit `1..=9` or an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    Digit(u8),
    Op(Operator),
}

impl Symbol {
    pub fn is_operator(self) -> bool {
        matches!(self, Symbol::Op(_))
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Digit(d) => char::from_digit(u32::from(d), 10).unwrap_or('?'),
            Symbol::Op(op) => op.as_char(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Looks up a 4-bit code. Returns `None` for the unassigned codes.
pub fn lookup(code: u8) -> Option<Symbol> {
    match code {
        1..=9 => Some(Symbol::Digit(code)),
        0b1010 => Some(Symbol::Op(Operator::Add)),
        0b1011 => Some(Symbol::Op(Operator::Sub)),
        0b1100 => Some(Symbol::Op(Operator::Mul)),
        0b1101 => Some(Symbol::Op(Operator::Div)),
        _ => None,
    }
}

/// Inverse of [`lookup`].
///
/// Returns `None` for `Symbol::Digit` outside `1..=9`.
pub fn code_of(symbol: Symbol) -> Option<u8> {
    match symbol {
        Symbol::Digit(d @ 1..=9) => Some(d),
        Symbol::Digit(_) => None,
        Symbol::Op(op) => Some(op.code()),
    }
}

/// An ordered bit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genome {
    bits: Vec<bool>,
}

impl Genome {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Builds a genome by concatenating 4-bit codes (low nibble of each byte).
    pub fn from_codes(codes: &[u8]) -> Self {
        let bits = codes
            .iter()
            .flat_map(|&code| (0..SYMBOL_BITS).rev().map(move |i| (code >> i) & 1 == 1))
            .collect();
        Self { bits }
    }

    /// Builds a genome that encodes `symbols` in order.
    ///
    /// # Errors
    /// [`GaError::UnencodableDigit`] for a digit outside `1..=9`.
    pub fn from_symbols(symbols: &[Symbol]) -> Result<Self> {
        let codes = symbols
            .iter()
            .map(|&symbol| match symbol {
                Symbol::Digit(d) => code_of(symbol).ok_or(GaError::UnencodableDigit(d)),
                Symbol::Op(op) => Ok(op.code()),
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(Self::from_codes(&codes))
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Non-overlapping 4-bit codes, most significant bit first.
    ///
    /// A trailing partial window is never produced.
    pub fn windows(&self) -> impl Iterator<Item = u8> + '_ {
        self.bits
            .chunks_exact(SYMBOL_BITS)
            .map(|w| w.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Genome {
    type Err = GaError;

    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(GaError::InvalidGenome { position, found }),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(Self { bits })
    }
}

/// Generates `length` independent random bits, each set when a uniform
/// draw exceeds 0.5.
pub fn generate<R: Rng>(length: usize, rng: &mut R) -> Genome {
    let bits = (0..length).map(|_| rng.random::<f64>() > 0.5).collect();
    Genome { bits }
}

/// Decodes a genome into its accepted symbol sequence.
pub fn decode_symbols(genome: &Genome) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    // Primed as if an operator was just seen, so the first accepted symbol
    // must be an operand.
    let mut last_was_operator = true;

    for code in genome.windows() {
        let Some(symbol) = lookup(code) else {
            continue;
        };
        if symbol.is_operator() != last_was_operator {
            symbols.push(symbol);
            last_was_operator = !last_was_operator;
        }
    }

    symbols
}

/// Decodes a genome into an expression string such as `"7+4"`.
pub fn decode(genome: &Genome) -> String {
    decode_symbols(genome).into_iter().map(Symbol::as_char).collect()
}
