use super::lex::{lex, Extensions};
use super::token::{Extension, Kind};
use super::Error;
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Host statement patterns
///
/// A pattern is written as BASIC text. Identifiers are placeholders:
/// names starting with `I` must receive a variable the host may write,
/// any other name takes an expression. Everything else must appear
/// literally. For example an INPUT statement might offer `I`, `O;I`
/// and `O,I`.

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Fixed(Kind, Rc<str>),
    Output,
    Input,
    End,
}

impl Slot {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Output | Slot::Input)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Slot::Fixed(_, lexeme) => write!(f, "'{}'", lexeme),
            Slot::Output => write!(f, "expression"),
            Slot::Input => write!(f, "variable"),
            Slot::End => write!(f, "end of statement"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    slots: Vec<Slot>,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Pattern> {
        let (tokens, errors) = lex(source, &Extensions::new());
        if let Some(e) = errors.first() {
            let msg = format!("Error in pattern '{}': {}", source, e.text());
            return Err(error!(InternalError; &msg));
        }
        let slots = tokens
            .iter()
            .map(|t| match t.kind {
                Kind::Identifier if t.lexeme.starts_with('I') => Slot::Input,
                Kind::Identifier => Slot::Output,
                Kind::Eof => Slot::End,
                kind => Slot::Fixed(kind, t.lexeme.clone()),
            })
            .collect();
        Ok(Pattern { slots })
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Placeholders in the order their expressions are parsed.
    pub fn placeholders(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.is_placeholder())
    }
}

/// Host additions to the language: the keyword table for the scanner
/// and the patterns the parser resolves generic statements against.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    extensions: Extensions,
    patterns: HashMap<String, Vec<Pattern>>,
}

impl Grammar {
    pub fn new() -> Grammar {
        Grammar::default()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn patterns(&self, label: &str) -> Option<&[Pattern]> {
        self.patterns.get(label).map(|v| v.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(|k| k.as_str())
    }

    /// Register an output-rendering keyword. Returns the upper case label.
    pub fn add_output(&mut self, label: &str) -> Result<String> {
        let label = Grammar::check_label(label)?;
        self.patterns.remove(&label);
        self.extensions.insert(label.clone(), Extension::Output);
        Ok(label)
    }

    /// Register a pattern-driven keyword. Returns the upper case label.
    pub fn add_generic(&mut self, label: &str, patterns: &[&str]) -> Result<String> {
        let label = Grammar::check_label(label)?;
        if patterns.is_empty() {
            return Err(error!(InternalError; "A statement needs at least one pattern."));
        }
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<Vec<Pattern>>>()?;
        self.patterns.insert(label.clone(), patterns);
        self.extensions.insert(label.clone(), Extension::Generic);
        Ok(label)
    }

    fn check_label(label: &str) -> Result<String> {
        let upper = label.to_ascii_uppercase();
        let mut chars = upper.chars();
        let valid = match chars.next() {
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };
        if !valid {
            let msg = format!("Invalid statement label '{}'.", label);
            return Err(error!(InternalError; &msg));
        }
        if Kind::from_keyword(&upper).is_some() {
            let msg = format!("'{}' is a reserved keyword.", upper);
            return Err(error!(InternalError; &msg));
        }
        Ok(upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_patterns() {
        let p = Pattern::new("O;I").unwrap();
        assert_eq!(
            p.slots,
            vec![
                Slot::Output,
                Slot::Fixed(Kind::Semicolon, ";".into()),
                Slot::Input,
                Slot::End
            ]
        );
        assert_eq!(Pattern::new("").unwrap().slots, vec![Slot::End]);
    }

    #[test]
    fn test_labels() {
        let mut g = Grammar::new();
        assert_eq!(g.add_output("print").unwrap(), "PRINT");
        assert!(g.add_generic("goto", &["O"]).is_err());
        assert!(g.add_generic("color", &[]).is_err());
        assert!(g.add_generic("bad label", &["O"]).is_err());
        assert!(g.add_generic("color", &["O", "O,O"]).is_ok());
        assert_eq!(g.patterns("COLOR").map(|p| p.len()), Some(2));
        assert_eq!(g.extensions().get("PRINT"), Some(&Extension::Output));
    }
}
