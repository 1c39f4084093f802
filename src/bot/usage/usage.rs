use core::fmt;
use std::{collections::HashSet, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;

use crate::bot::state::def::{ConfigError, DefinitionError, GrammarError};

lazy_static! {
    // `[name]` or `<name>`, names may not contain another bracket
    static ref TOKEN_RE: Regex = Regex::new(r"\[([^\[\]<>]*)\]|<([^\[\]<>]*)>").expect("valid usage token pattern");
}

const BRACKETS: [char; 4] = ['[', ']', '<', '>'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind { Required, Optional }

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageToken {
    pub kind: TokenKind,
    /// Name without the leading `*`.
    pub name: String,
    pub variadic: bool,
}

impl UsageToken {
    pub fn required(name: impl Into<String>) -> Self {
        Self { kind: TokenKind::Required, name: name.into(), variadic: false }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self { kind: TokenKind::Optional, name: name.into(), variadic: false }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.kind == TokenKind::Required
    }

    pub fn is_optional(&self) -> bool {
        self.kind == TokenKind::Optional
    }

    fn from_inner(kind: TokenKind, inner: &str, usage: &str) -> Result<Self, ConfigError> {
        let inner = inner.trim();
        let (variadic, name) = match inner.strip_prefix('*') {
            Some(rest) => (true, rest.trim()),
            None => (false, inner),
        };

        if name.is_empty() {
            return Err(ConfigError::MalformedUsage {
                usage: usage.to_string(),
                reason: "argument with an empty name".into(),
            });
        }

        Ok(Self { kind, name: name.to_string(), variadic })
    }
}

impl fmt::Display for UsageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = if self.variadic { "*" } else { "" };
        match self.kind {
            TokenKind::Required => write!(f, "<{}{}>", star, self.name),
            TokenKind::Optional => write!(f, "[{}{}]", star, self.name),
        }
    }
}

/// A validated usage string together with the argument tokens it declares.
///
/// Tokens are `<name>` (required) and `[name]` (optional). A `*` in front of
/// the name marks the token as variadic, it then swallows every remaining
/// word and must be the last token. Any other text is kept verbatim for help
/// output and ignored by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    raw: String,
    tokens: Vec<UsageToken>,
}

impl Usage {
    pub fn parse(raw: &str) -> Result<Self, DefinitionError> {
        let tokens = extract_tokens(raw)?;
        check_order(&tokens)?;

        Ok(Self { raw: raw.trim().to_string(), tokens })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[UsageToken] {
        &self.tokens
    }

    pub fn required_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_required()).count()
    }

    pub fn variadic(&self) -> Option<&UsageToken> {
        self.tokens.last().filter(|t| t.variadic)
    }
}

impl FromStr for Usage {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Usage::parse(s)
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn extract_tokens(raw: &str) -> Result<Vec<UsageToken>, ConfigError> {
    let mut tokens = Vec::new();
    let mut residue = String::with_capacity(raw.len());
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(raw) {
        let Some(whole) = caps.get(0) else { continue };
        residue.push_str(&raw[last..whole.start()]);
        last = whole.end();

        let token = match (caps.get(1), caps.get(2)) {
            (Some(inner), _) => UsageToken::from_inner(TokenKind::Optional, inner.as_str(), raw)?,
            (None, Some(inner)) => UsageToken::from_inner(TokenKind::Required, inner.as_str(), raw)?,
            (None, None) => continue,
        };
        tokens.push(token);
    }
    residue.push_str(&raw[last..]);

    if let Some(stray) = residue.chars().find(|c| BRACKETS.contains(c)) {
        return Err(ConfigError::MalformedUsage {
            usage: raw.to_string(),
            reason: format!("unmatched `{}`", stray),
        });
    }

    // arguments are looked up by name once bound
    let mut seen = HashSet::new();
    if let Some(repeated) = tokens.iter().find(|t| !seen.insert(t.name.as_str())) {
        return Err(ConfigError::MalformedUsage {
            usage: raw.to_string(),
            reason: format!("duplicate argument {}", repeated.name),
        });
    }

    Ok(tokens)
}

fn check_order(tokens: &[UsageToken]) -> Result<(), GrammarError> {
    for pair in tokens.windows(2) {
        let (previous, token) = (&pair[0], &pair[1]);

        if token.is_required() && previous.is_optional() {
            return Err(GrammarError::RequiredAfterOptional {
                token: token.to_string(),
                optional: previous.to_string(),
            });
        }
        if previous.variadic {
            return Err(GrammarError::TokenAfterVariadic {
                token: token.to_string(),
                variadic: previous.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_error(usage: &str) -> GrammarError {
        match Usage::parse(usage) {
            Err(DefinitionError::Grammar(e)) => e,
            other => panic!("expected a grammar error for {usage:?}, got {other:?}"),
        }
    }

    fn config_error(usage: &str) -> ConfigError {
        match Usage::parse(usage) {
            Err(DefinitionError::Config(e)) => e,
            other => panic!("expected a configuration error for {usage:?}, got {other:?}"),
        }
    }

    #[test]
    fn required_then_optional_keeps_source_order() {
        let usage = Usage::parse("<user> [reason]").unwrap();
        assert_eq!(usage.tokens(), &[UsageToken::required("user"), UsageToken::optional("reason")]);
        assert_eq!(usage.required_count(), 1);
        assert_eq!(usage.variadic(), None);
    }

    #[test]
    fn longer_well_formed_sequences() {
        let usage = Usage::parse("<a> <b> <c> [d] [e]").unwrap();
        let names: Vec<_> = usage.tokens().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "d", "e"]);
        assert_eq!(usage.required_count(), 3);

        assert!(Usage::parse("[only] [optional]").is_ok());
        assert!(Usage::parse("<only> <required>").is_ok());
    }

    #[test]
    fn literal_words_are_ignored() {
        let usage = Usage::parse("tag add <name> [*text]").unwrap();
        assert_eq!(usage.tokens(), &[UsageToken::required("name"), UsageToken::optional("text").variadic()]);
        assert_eq!(usage.as_str(), "tag add <name> [*text]");

        let bare = Usage::parse("ping").unwrap();
        assert!(bare.tokens().is_empty());
    }

    #[test]
    fn required_after_optional_is_rejected() {
        assert_eq!(
            grammar_error("[reason] <user>"),
            GrammarError::RequiredAfterOptional { token: "<user>".into(), optional: "[reason]".into() }
        );
        assert!(matches!(grammar_error("<a> [b] [c] <d>"), GrammarError::RequiredAfterOptional { .. }));
    }

    #[test]
    fn token_after_variadic_is_rejected() {
        assert_eq!(
            grammar_error("<a> <*rest> <b>"),
            GrammarError::TokenAfterVariadic { token: "<b>".into(), variadic: "<*rest>".into() }
        );
        assert!(matches!(grammar_error("[*rest] [more]"), GrammarError::TokenAfterVariadic { .. }));
    }

    #[test]
    fn required_after_optional_wins_over_variadic() {
        assert!(matches!(grammar_error("[*rest] <b>"), GrammarError::RequiredAfterOptional { .. }));
    }

    #[test]
    fn variadic_in_last_position_is_accepted() {
        let usage = Usage::parse("<target> <*words>").unwrap();
        assert_eq!(usage.variadic(), Some(&UsageToken::required("words").variadic()));

        let usage = Usage::parse("[*words]").unwrap();
        assert!(usage.variadic().is_some_and(|t| t.is_optional()));
    }

    #[test]
    fn malformed_brackets_are_configuration_errors() {
        for usage in ["<x]", "[x>", "<a> [b", "<a <b>>", "<a [b]>", "stray ]"] {
            assert!(
                matches!(config_error(usage), ConfigError::MalformedUsage { .. }),
                "{usage:?} should be malformed"
            );
        }
    }

    #[test]
    fn empty_token_names_are_configuration_errors() {
        for usage in ["<>", "[ ]", "<*>", "[* ]"] {
            assert!(matches!(config_error(usage), ConfigError::MalformedUsage { .. }));
        }
    }

    #[test]
    fn repeated_argument_names_are_configuration_errors() {
        for usage in ["x <user> <user>", "x <user> [user]", "x <user> [*user]"] {
            assert_eq!(
                config_error(usage),
                ConfigError::MalformedUsage { usage: usage.into(), reason: "duplicate argument user".into() }
            );
        }
        assert!(Usage::parse("x <user> <target>").is_ok());
    }

    #[test]
    fn validation_is_idempotent() {
        for usage in ["<user> [reason]", "[reason] <user>", "<a> <*rest> <b>", "<x]"] {
            assert_eq!(Usage::parse(usage), Usage::parse(usage));
        }

        let first = Usage::parse("<user> [*reason]").unwrap();
        let second: Usage = first.as_str().parse().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn tokens_render_back_to_their_syntax() {
        assert_eq!(UsageToken::required("user").to_string(), "<user>");
        assert_eq!(UsageToken::optional("rest").variadic().to_string(), "[*rest]");
    }
}
