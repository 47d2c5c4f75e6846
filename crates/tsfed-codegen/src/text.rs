//! Tokenized declaration text
//!
//! Generated declaration text is kept as a sequence of plain text and
//! identifier segments instead of a rendered string. Renames and external
//! rewrites are resolved when the text is rendered, so a declaration renamed
//! after its dependents were parsed still prints consistently everywhere.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|//[^\n]*|/\*.*?\*/|[A-Za-z_$][A-Za-z0-9_$]*"#,
    )
    .expect("Invalid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Ident {
        name: String,
        /// False for member accesses (`a.Name`) and for names directly
        /// followed by `:`, `?` or a quote (property keys, parameter names)
        bindable: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationText {
    segments: Vec<Segment>,
}

impl DeclarationText {
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for token in TOKEN_PATTERN.find_iter(text) {
            let value = token.as_str();
            if !starts_identifier(value) {
                continue;
            }

            let previous = text[..token.start()].chars().next_back();
            let next = text[token.end()..].chars().next();
            let bindable = previous != Some('.')
                && !matches!(next, Some('\'' | '"' | ':' | '?'));

            if token.start() > last {
                segments.push(Segment::Text(text[last..token.start()].to_string()));
            }
            segments.push(Segment::Ident {
                name: value.to_string(),
                bindable,
            });
            last = token.end();
        }

        if last < text.len() {
            segments.push(Segment::Text(text[last..].to_string()));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render the text.
    ///
    /// The first occurrence of `own_name` (the declaration site) and every
    /// bindable occurrence after it print as `display_name`. Other bindable
    /// identifiers are looked up through `resolve`.
    pub fn render(
        &self,
        own_name: &str,
        display_name: &str,
        resolve: &dyn Fn(&str) -> Option<String>,
    ) -> String {
        let mut out = String::new();
        let mut declared = false;

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Ident { name, bindable } => {
                    if name == own_name && (!declared || *bindable) {
                        declared = true;
                        out.push_str(display_name);
                        continue;
                    }
                    match bindable.then(|| resolve(name)).flatten() {
                        Some(replacement) => out.push_str(&replacement),
                        None => out.push_str(name),
                    }
                }
            }
        }

        out
    }

    /// Render without any rename or rewrite
    pub fn source(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.as_str(),
                Segment::Ident { name, .. } => name.as_str(),
            })
            .collect()
    }
}

fn starts_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
}
