use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed key template such as `user:{id}:sessions`.
///
/// Placeholders are `{name}`; `{{` and `}}` produce literal braces. Only named
/// placeholders are accepted, positional (`{}`, `{0}`) and formatted
/// (`{id:>4}`) fields are rejected when parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidTemplate {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = vec![];
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(invalid("unexpected '{' in placeholder")),
                            Some(c) => name.push(c),
                            None => return Err(invalid("unterminated placeholder")),
                        }
                    }
                    if name.is_empty() || name.chars().all(|c| c.is_ascii_digit()) {
                        return Err(invalid("positional placeholders are not supported"));
                    }
                    if name.contains([':', '!', '.', '[', ']']) {
                        return Err(invalid("only plain named placeholders are supported"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' => return Err(invalid("single '}' encountered")),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            source: source.to_string(),
            segments,
        })
    }

    /// Substitute every placeholder from `args`. Unused arguments are ignored.
    pub fn format(&self, args: &[(&str, &str)]) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value = args
                        .iter()
                        .find(|(k, _)| *k == name.as_str())
                        .map(|(_, v)| *v)
                        .ok_or_else(|| Error::MissingArgument(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}
