//! A hand-written tokenizer for the netlist text format.
//!
//! The format has exactly one production rule (`NET name cell+ ;`), so a whitespace-splitting
//! tokenizer is all it needs; pulling in a parser-combinator crate for this would be
//! disproportionate.

use std::fmt;

use fm::{BuildError, NetlistBuilder};

/// Everything that can go wrong while reading a netlist file, short of the I/O itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The file was empty, or its first token wasn't parseable at all.
    MissingBalanceFactor,
    /// The first token parsed, but not as a number in `(0, 1)`.
    InvalidBalanceFactor(String),
    /// A `NET` record ran out of tokens before a terminating `;`.
    UnterminatedNet { net_name: String },
    /// A `NET` record had no distinct cells after deduplication.
    EmptyNet { net_name: String },
    /// Two `NET` records used the same name.
    DuplicateNetName(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingBalanceFactor => {
                write!(f, "input is missing the leading balance factor")
            }
            ParseError::InvalidBalanceFactor(tok) => {
                write!(f, "balance factor {tok:?} is not a number in (0, 1)")
            }
            ParseError::UnterminatedNet { net_name } => {
                write!(f, "net {net_name:?} is missing its terminating `;`")
            }
            ParseError::EmptyNet { net_name } => write!(f, "net {net_name:?} has no cells"),
            ParseError::DuplicateNetName(name) => write!(f, "duplicate net name {name:?}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<BuildError> for ParseError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::EmptyNet { net_name } => ParseError::EmptyNet { net_name },
            BuildError::DuplicateNetName(name) => ParseError::DuplicateNetName(name),
        }
    }
}

/// The result of parsing a whole netlist file: the balance factor and the netlist itself, ready
/// to be handed to [`fm::Partitioner::new`].
pub struct ParsedInput {
    pub balance_factor: f64,
    pub netlist: fm::Netlist,
}

/// Parses a complete netlist file from its text contents.
pub fn parse(input: &str) -> Result<ParsedInput, ParseError> {
    let mut tokens = input.split_whitespace();

    let balance_factor = parse_balance_factor(tokens.next())?;

    let mut builder = NetlistBuilder::new();
    loop {
        let Some(keyword) = tokens.next() else {
            break;
        };
        if keyword != "NET" {
            // Anything other than `NET` or end-of-input is ill-formed; treat a stray token as
            // the start of an unterminated record sharing its own text as the name, which still
            // surfaces a useful message.
            return Err(ParseError::UnterminatedNet {
                net_name: keyword.to_owned(),
            });
        }
        let net_name = tokens
            .next()
            .ok_or_else(|| ParseError::UnterminatedNet {
                net_name: String::new(),
            })?
            .to_owned();

        let mut cell_names: Vec<String> = Vec::new();
        let mut terminated = false;
        for tok in tokens.by_ref() {
            if tok == ";" {
                terminated = true;
                break;
            }
            cell_names.push(tok.to_owned());
        }
        if !terminated {
            return Err(ParseError::UnterminatedNet { net_name });
        }

        builder.add_net(net_name, &cell_names)?;
    }

    Ok(ParsedInput {
        balance_factor,
        netlist: builder.finish(),
    })
}

fn parse_balance_factor(tok: Option<&str>) -> Result<f64, ParseError> {
    let tok = tok.ok_or(ParseError::MissingBalanceFactor)?;
    let value: f64 = tok
        .parse()
        .map_err(|_| ParseError::InvalidBalanceFactor(tok.to_owned()))?;
    if !(value > 0.0 && value < 1.0) {
        return Err(ParseError::InvalidBalanceFactor(tok.to_owned()));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
