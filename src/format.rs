//! Writing preserved format back out.
//!
//! With format preservation on, the tokens of all objects concatenate to the
//! original input. [`Object::render_with`] additionally lets a caller swap
//! attribute values while keeping comments, blanks and ordering untouched.

use crate::ast::{Argument, FormatKind, Object, ObjectList};

impl<'src> Object<'src> {
    /// The text this object was parsed from, or `None` without preserved format.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.render_with(|_| None)
    }

    /// Like [`Object::render`], but every attribute value for which
    /// `substitute` returns `Some` is replaced by that text.
    pub fn render_with<F>(&self, mut substitute: F) -> Option<String>
    where
        F: FnMut(&Argument<'src>) -> Option<String>,
    {
        let tokens = self.format_tokens.as_ref()?;
        let mut out = String::new();
        for token in tokens {
            let replacement = match token.kind {
                FormatKind::AttributeValue { argument } => {
                    self.arguments.get(argument).and_then(&mut substitute)
                }
                FormatKind::Literal => None,
            };
            match replacement {
                Some(text) => out.push_str(&text),
                None => out.push_str(token.text),
            }
        }
        Some(out)
    }
}

/// Concatenates the preserved format of every object, reproducing the input.
///
/// Returns `None` if the objects were parsed without format preservation.
pub fn reconstruct(objects: &ObjectList<'_>) -> Option<String> {
    if objects.iter().any(|o| o.format_tokens.is_none()) {
        return None;
    }
    Some(objects.iter().filter_map(Object::render).collect())
}
