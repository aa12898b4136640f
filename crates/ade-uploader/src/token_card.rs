//! Token cards: the 8x8 grid of one-time tokens an account is issued.
//!
//! A coordinate `[<row>, <column>]` names row 1-8 of column A-H. Cards load
//! from JSON (`{userId, username, expDate, tokens}`) or from the plain-text
//! card export:
//!
//! ```text
//! Test Peter Testesen (14567) | Expires: Feb 28, 2025
//! 1 2 3 4 5 6 7 8
//! A iuh7 9iik lkmd ssuu sbna wyyh mkki aayh
//! ...
//! H am12 lw92 ie7x m7tg 9hg6 7gbc cu72 si82
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TokenCardError;

pub const COLUMNS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
pub const ROWS: u32 = 8;

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s*\((\d+)\)").expect("Invalid token card header regex")
});

static EXPIRES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Expires:\s*(.+?)\s*$").expect("Invalid token card expiry regex")
});

static COORDINATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([1-8]), ([A-H])\]").expect("Invalid token coordinate regex")
});

/// Position of one token on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenCoordinate {
    row: u32,
    column: char,
}

impl TokenCoordinate {
    pub fn new(row: u32, column: char) -> Result<Self, TokenCardError> {
        if !COLUMNS.contains(&column) {
            return Err(TokenCardError::ColumnOutOfRange { column });
        }
        if !(1..=ROWS).contains(&row) {
            return Err(TokenCardError::RowOutOfRange { row });
        }
        Ok(Self { row, column })
    }

    /// First `[<1-8>, <A-H>]` annotation in `text`.
    pub fn find(text: &str) -> Option<Self> {
        let caps = COORDINATE_REGEX.captures(text)?;
        let row = caps.get(1)?.as_str().parse().ok()?;
        let column = caps.get(2)?.as_str().chars().next()?;
        Some(Self { row, column })
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn column(&self) -> char {
        self.column
    }
}

impl fmt::Display for TokenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

/// Whether `prompt` carries a token coordinate annotation.
pub fn contains_coordinates(prompt: &str) -> bool {
    COORDINATE_REGEX.is_match(prompt)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCard {
    pub user_id: i64,
    pub username: String,
    pub exp_date: String,
    /// Column letter -> tokens for rows 1 to 8.
    tokens: BTreeMap<String, Vec<String>>,
}

impl TokenCard {
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        exp_date: impl Into<String>,
        tokens: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, TokenCardError> {
        let card = Self {
            user_id,
            username: username.into(),
            exp_date: exp_date.into(),
            tokens,
        };
        card.check_complete()?;
        Ok(card)
    }

    /// Load a JSON or plain-text card.
    pub fn load(path: &Path) -> Result<Self, TokenCardError> {
        let text = std::fs::read_to_string(path).map_err(|source| TokenCardError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim_start().starts_with('{') {
            let card: Self = serde_json::from_str(&text).map_err(TokenCardError::Json)?;
            card.check_complete()?;
            Ok(card)
        } else {
            Self::parse_text(&text)
        }
    }

    /// Parse the plain-text card export.
    pub fn parse_text(text: &str) -> Result<Self, TokenCardError> {
        let header = text
            .lines()
            .find_map(|line| HEADER_REGEX.captures(line))
            .ok_or(TokenCardError::MissingHeader)?;
        let username = header[1].to_string();
        let user_id = header[2]
            .parse()
            .map_err(|_| TokenCardError::MissingHeader)?;
        let exp_date = text
            .lines()
            .find_map(|line| EXPIRES_REGEX.captures(line))
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();

        let mut tokens = BTreeMap::new();
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let Some(label) = fields.next() else {
                continue;
            };
            let mut label_chars = label.chars();
            match (label_chars.next(), label_chars.next()) {
                (Some(column), None) if COLUMNS.contains(&column) => {
                    tokens.insert(column.to_string(), fields.map(str::to_string).collect());
                }
                _ => {}
            }
        }

        Self::new(user_id, username, exp_date, tokens)
    }

    /// Token at `coordinate`.
    pub fn token(&self, coordinate: TokenCoordinate) -> Result<&str, TokenCardError> {
        let column = coordinate.column();
        let tokens = self
            .tokens
            .get(column.to_string().as_str())
            .ok_or(TokenCardError::MissingColumn { column })?;
        let index = (coordinate.row() - 1) as usize;
        tokens
            .get(index)
            .map(String::as_str)
            .ok_or(TokenCardError::ColumnLength {
                column,
                found: tokens.len(),
            })
    }

    fn check_complete(&self) -> Result<(), TokenCardError> {
        for column in COLUMNS {
            let tokens = self
                .tokens
                .get(column.to_string().as_str())
                .ok_or(TokenCardError::MissingColumn { column })?;
            if tokens.len() != ROWS as usize {
                return Err(TokenCardError::ColumnLength {
                    column,
                    found: tokens.len(),
                });
            }
        }
        Ok(())
    }
}
