#![forbid(unsafe_code)]

//! Compound simple selectors (`tag`, `#id`, `.class`, and combinations).
//!
//! Only the subset the modal needs to address its own controls is
//! supported: one compound selector, no combinators, no attributes.

use std::fmt;
use std::str::FromStr;

/// Selector parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unsupported character {found:?} in selector {selector:?}")]
    Unsupported { selector: String, found: char },
    #[error("dangling '{marker}' in selector {selector:?}")]
    Dangling { selector: String, marker: char },
}

/// A parsed compound selector such as `a.dismiss` or `#modal1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Selector {
    source: String,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a selector.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut tag = None;
        let mut id = None;
        let mut classes = Vec::new();

        let mut marker: Option<char> = None;
        let mut current = String::new();
        let mut flush = |marker: Option<char>, current: &mut String| -> Result<(), SelectorError> {
            let word = std::mem::take(current);
            match marker {
                None if word.is_empty() => Ok(()),
                None => {
                    tag = Some(word.to_ascii_lowercase());
                    Ok(())
                }
                Some(m) if word.is_empty() => Err(SelectorError::Dangling {
                    selector: source.to_string(),
                    marker: m,
                }),
                Some('#') => {
                    id = Some(word);
                    Ok(())
                }
                Some(_) => {
                    classes.push(word);
                    Ok(())
                }
            }
        };

        for ch in source.chars() {
            match ch {
                '#' | '.' => {
                    flush(marker, &mut current)?;
                    marker = Some(ch);
                }
                c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => current.push(c),
                other => {
                    return Err(SelectorError::Unsupported {
                        selector: source.to_string(),
                        found: other,
                    });
                }
            }
        }
        flush(marker, &mut current)?;

        Ok(Self {
            source: source.to_string(),
            tag,
            id,
            classes,
        })
    }

    /// Selector matching a single class.
    pub fn class(name: &str) -> Self {
        Self {
            source: format!(".{name}"),
            tag: None,
            id: None,
            classes: vec![name.to_string()],
        }
    }

    /// Selector matching a single id.
    pub fn id(name: &str) -> Self {
        Self {
            source: format!("#{name}"),
            tag: None,
            id: Some(name.to_string()),
            classes: Vec::new(),
        }
    }

    /// The selector text as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Required tag name, lowercased.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Required id.
    pub fn id_name(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Required classes, in source order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Test an element description against this selector.
    pub fn matches<S: AsRef<str>>(&self, tag: &str, id: Option<&str>, classes: &[S]) -> bool {
        if let Some(want) = &self.tag
            && !want.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(want) = &self.id
            && id != Some(want.as_str())
        {
            return false;
        }
        self.classes
            .iter()
            .all(|want| classes.iter().any(|have| have.as_ref() == want))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Selector> for String {
    fn from(value: Selector) -> Self {
        value.source
    }
}
