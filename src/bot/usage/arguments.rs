use thiserror::Error;

use crate::bot::usage::usage::Usage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("Missing argument {0}")]
    Missing(String),
    #[error("Expected at most {expected} arguments, got {got}")]
    TooMany { expected: usize, got: usize },
}

/// Words of a command invocation matched against the command's usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArguments {
    words: Vec<String>,
    named: Vec<(String, String)>,
    rest: Vec<String>,
}

impl BoundArguments {
    /// Value of a non-variadic token, `None` when an optional token was not given.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Words taken by the variadic token.
    pub fn rest(&self) -> &[String] {
        &self.rest
    }

    pub fn rest_joined(&self) -> Option<String> {
        (!self.rest.is_empty()).then(|| self.rest.join(" "))
    }

    /// Every word after the command name, in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Usage {
    pub fn bind<S: AsRef<str>>(&self, words: &[S]) -> Result<BoundArguments, ArgumentError> {
        let words: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();
        let mut named = Vec::new();

        for (i, token) in self.tokens().iter().enumerate() {
            if token.variadic {
                let rest = words.get(i..).unwrap_or_default().to_vec();
                if rest.is_empty() && token.is_required() {
                    return Err(ArgumentError::Missing(token.to_string()));
                }
                return Ok(BoundArguments { words, named, rest });
            }

            match words.get(i) {
                Some(word) => named.push((token.name.clone(), word.clone())),
                None if token.is_required() => return Err(ArgumentError::Missing(token.to_string())),
                None => {}
            }
        }

        if words.len() > self.tokens().len() {
            return Err(ArgumentError::TooMany { expected: self.tokens().len(), got: words.len() });
        }

        Ok(BoundArguments { words, named, rest: Vec::new() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(s: &str) -> Usage {
        Usage::parse(s).unwrap()
    }

    #[test]
    fn binds_required_and_optional_words() {
        let args = usage("ban <user> [reason]").bind(&["bob", "spam"]).unwrap();
        assert_eq!(args.get("user"), Some("bob"));
        assert_eq!(args.get("reason"), Some("spam"));

        let args = usage("ban <user> [reason]").bind(&["bob"]).unwrap();
        assert_eq!(args.get("reason"), None);
        assert_eq!(args.words(), ["bob"]);
    }

    #[test]
    fn missing_required_word_names_the_token() {
        let err = usage("ban <user> [reason]").bind::<&str>(&[]).unwrap_err();
        assert_eq!(err, ArgumentError::Missing("<user>".into()));
    }

    #[test]
    fn extra_words_without_variadic_are_rejected() {
        let err = usage("ban <user> [reason]").bind(&["bob", "spam", "again"]).unwrap_err();
        assert_eq!(err, ArgumentError::TooMany { expected: 2, got: 3 });

        let err = usage("ping").bind(&["hello"]).unwrap_err();
        assert_eq!(err, ArgumentError::TooMany { expected: 0, got: 1 });
    }

    #[test]
    fn variadic_collects_the_tail() {
        let args = usage("say <channel> <*text>").bind(&["general", "hello", "there"]).unwrap();
        assert_eq!(args.get("channel"), Some("general"));
        assert_eq!(args.get("text"), None);
        assert_eq!(args.rest(), ["hello", "there"]);
        assert_eq!(args.rest_joined().as_deref(), Some("hello there"));
    }

    #[test]
    fn required_variadic_needs_one_word() {
        let err = usage("say <channel> <*text>").bind(&["general"]).unwrap_err();
        assert_eq!(err, ArgumentError::Missing("<*text>".into()));

        let args = usage("tag <name> [*text]").bind(&["rules"]).unwrap();
        assert!(args.rest().is_empty());
        assert_eq!(args.rest_joined(), None);
    }
}
