//! Well-known text → GeoJSON geometry.
//!
//! Supports the simple feature types (`POINT`, `LINESTRING`, `POLYGON`,
//! their `MULTI` forms and `GEOMETRYCOLLECTION`), `EMPTY` geometries and
//! optional `Z`/`M`/`ZM` tags. Coordinates keep every ordinate given; the
//! shape check decides later whether they are acceptable.

use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WktError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
    #[error("unknown geometry type `{0}`")]
    UnknownType(String),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    Open,
    Close,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Word(word) => word.clone(),
            Self::Number(number) => number.to_string(),
            Self::Open => "(".to_string(),
            Self::Close => ")".to_string(),
            Self::Comma => ",".to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, WktError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some(&(start, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = start;
                while let Some(&(index, c)) = chars.peek() {
                    if !c.is_ascii_alphanumeric() {
                        break;
                    }
                    end = index + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Word(text[start..end].to_ascii_uppercase()));
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                let mut end = start;
                while let Some(&(index, c)) = chars.peek() {
                    if !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')) {
                        break;
                    }
                    end = index + c.len_utf8();
                    chars.next();
                }
                let literal = &text[start..end];
                let number: f64 = literal
                    .parse()
                    .map_err(|_| WktError::InvalidNumber(literal.to_string()))?;
                if !number.is_finite() {
                    return Err(WktError::InvalidNumber(literal.to_string()));
                }
                tokens.push(Token::Number(number));
            }
            other => return Err(WktError::UnexpectedToken(other.to_string())),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

type Parsed<T> = Result<T, WktError>;

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Parsed<Token> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or(WktError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> Parsed<()> {
        let token = self.next()?;
        if &token == expected {
            Ok(())
        } else {
            Err(WktError::UnexpectedToken(token.describe()))
        }
    }

    fn word(&mut self) -> Parsed<String> {
        match self.next()? {
            Token::Word(word) => Ok(word),
            other => Err(WktError::UnexpectedToken(other.describe())),
        }
    }

    fn peek_word(&self, candidates: &[&str]) -> bool {
        matches!(self.peek(), Some(Token::Word(word)) if candidates.contains(&word.as_str()))
    }

    /// `( item {, item} )`
    fn list<T>(&mut self, item: fn(&mut Self) -> Parsed<T>) -> Parsed<Vec<T>> {
        self.expect(&Token::Open)?;
        let mut items = vec![item(self)?];
        loop {
            match self.next()? {
                Token::Comma => items.push(item(self)?),
                Token::Close => return Ok(items),
                other => return Err(WktError::UnexpectedToken(other.describe())),
            }
        }
    }

    fn coordinate(&mut self) -> Parsed<Value> {
        let mut ordinates = Vec::new();
        while let Some(Token::Number(number)) = self.peek() {
            ordinates.push(Value::from(*number));
            self.position += 1;
        }
        if ordinates.is_empty() {
            return Err(match self.peek() {
                Some(token) => WktError::UnexpectedToken(token.describe()),
                None => WktError::UnexpectedEnd,
            });
        }
        Ok(Value::Array(ordinates))
    }

    fn coordinates(&mut self) -> Parsed<Value> {
        self.list(Self::coordinate).map(Value::Array)
    }

    fn rings(&mut self) -> Parsed<Value> {
        self.list(Self::coordinates).map(Value::Array)
    }

    /// A multipoint member, with or without its own parentheses.
    fn multipoint_member(&mut self) -> Parsed<Value> {
        if self.peek() == Some(&Token::Open) {
            self.expect(&Token::Open)?;
            let coordinate = self.coordinate()?;
            self.expect(&Token::Close)?;
            Ok(coordinate)
        } else {
            self.coordinate()
        }
    }

    fn geometry(&mut self) -> Parsed<Value> {
        let kind = self.word()?;
        if self.peek_word(&["Z", "M", "ZM"]) {
            self.position += 1;
        }
        let type_name = match kind.as_str() {
            "POINT" => "Point",
            "LINESTRING" => "LineString",
            "POLYGON" => "Polygon",
            "MULTIPOINT" => "MultiPoint",
            "MULTILINESTRING" => "MultiLineString",
            "MULTIPOLYGON" => "MultiPolygon",
            "GEOMETRYCOLLECTION" => "GeometryCollection",
            _ => return Err(WktError::UnknownType(kind)),
        };
        let empty = self.peek_word(&["EMPTY"]);
        if empty {
            self.position += 1;
        }
        if type_name == "GeometryCollection" {
            let geometries = if empty {
                Vec::new()
            } else {
                self.list(Self::geometry)?
            };
            return Ok(json!({"type": type_name, "geometries": geometries}));
        }
        let coordinates = if empty {
            Value::Array(Vec::new())
        } else {
            match type_name {
                "Point" => {
                    self.expect(&Token::Open)?;
                    let coordinate = self.coordinate()?;
                    self.expect(&Token::Close)?;
                    coordinate
                }
                "LineString" => self.coordinates()?,
                "Polygon" | "MultiLineString" => self.rings()?,
                "MultiPoint" => Value::Array(self.list(Self::multipoint_member)?),
                _ => Value::Array(self.list(Self::rings)?),
            }
        };
        let mut geometry = Map::new();
        geometry.insert("type".to_string(), Value::String(type_name.to_string()));
        geometry.insert("coordinates".to_string(), coordinates);
        Ok(Value::Object(geometry))
    }
}

/// Parses one WKT geometry into a GeoJSON geometry object.
pub fn parse_wkt(text: &str) -> Result<Value, WktError> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        position: 0,
    };
    let geometry = parser.geometry()?;
    match parser.peek() {
        None => Ok(geometry),
        Some(token) => Err(WktError::UnexpectedToken(token.describe())),
    }
}
