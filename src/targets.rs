use std::fmt;

use url::Url;

// ─── Target ──────────────────────────────────────────────────────

/// One endpoint to poll.  Built only through [`validate`], so every
/// `Target` is an absolute `http`/`https` URL with a non-empty host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// The operator's input, whitespace-trimmed.  Used as the table label.
    label: String,
    url: Url,
}

impl Target {
    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

// ─── Validation errors ───────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("at least one URL is required")]
    NoTargets,

    #[error("argument {position} is empty")]
    Empty { position: usize },

    #[error("invalid URL '{input}': {source}")]
    Malformed {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL '{input}' must have http or https scheme (got '{scheme}')")]
    UnsupportedScheme { input: String, scheme: String },

    #[error("URL '{input}' must have a valid host")]
    MissingHost { input: String },
}

// ─── Validation ──────────────────────────────────────────────────

/// Validates the whole input list.  The first bad entry rejects the run;
/// nothing is partially accepted.
pub fn validate<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Target>, TargetError> {
    if inputs.is_empty() {
        return Err(TargetError::NoTargets);
    }

    inputs
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_target(i + 1, raw.as_ref()))
        .collect()
}

fn parse_target(position: usize, raw: &str) -> Result<Target, TargetError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(TargetError::Empty { position });
    }

    let url = match Url::parse(input) {
        Ok(url) => url,
        // `http://` and friends fail inside the parser rather than parsing
        // to an empty host.
        Err(url::ParseError::EmptyHost) => {
            return Err(TargetError::MissingHost {
                input: input.to_owned(),
            })
        }
        Err(source) => {
            return Err(TargetError::Malformed {
                input: input.to_owned(),
                source,
            })
        }
    };

    if !matches!(url.scheme(), "http" | "https") {
        return Err(TargetError::UnsupportedScheme {
            input: input.to_owned(),
            scheme: url.scheme().to_owned(),
        });
    }

    // `Url` repairs `http:///path` and `http:example.com` into a host the
    // operator never typed; require a literal authority.
    if !has_authority(input) || url.host_str().map_or(true, str::is_empty) {
        return Err(TargetError::MissingHost {
            input: input.to_owned(),
        });
    }

    Ok(Target {
        label: input.to_owned(),
        url,
    })
}

/// True when `input` has a non-empty `//authority` right after its scheme.
fn has_authority(input: &str) -> bool {
    let Some((_, rest)) = input.split_once(':') else {
        return false;
    };
    let Some(rest) = rest.strip_prefix("//") else {
        return false;
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    !rest[..end].is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        let targets = validate(&["http://example.com", "https://google.com"]).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].as_str(), "http://example.com");
        assert_eq!(targets[1].url().scheme(), "https");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let targets = validate(&["  https://example.com  "]).unwrap();
        assert_eq!(targets[0].as_str(), "https://example.com");
    }

    #[test]
    fn rejects_empty_list() {
        let empty: [&str; 0] = [];
        assert!(matches!(validate(&empty), Err(TargetError::NoTargets)));
    }

    #[test]
    fn rejects_wrong_scheme() {
        for input in ["ftp://example.com", "file:///etc/passwd"] {
            let err = validate(&[input]).unwrap_err();
            assert!(
                matches!(err, TargetError::UnsupportedScheme { .. }),
                "{input}: {err}"
            );
            assert!(err.to_string().contains("must have http or https scheme"));
        }
    }

    #[test]
    fn rejects_missing_host() {
        for input in ["http://", "https://", "http://:80", "http:///path", "http:example.com"] {
            let err = validate(&[input]).unwrap_err();
            assert!(matches!(err, TargetError::MissingHost { .. }), "{input}: {err}");
            assert!(err.to_string().contains("must have a valid host"));
        }
    }

    #[test]
    fn accepts_authority_followed_by_path_or_query() {
        let targets =
            validate(&["https://example.com/a/b", "http://example.com?q=1", "http://example.com:8080"])
                .unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[2].url().port(), Some(8080));
    }

    #[test]
    fn rejects_empty_entry_with_position() {
        let err = validate(&["https://example.com", "   "]).unwrap_err();
        assert!(matches!(err, TargetError::Empty { position: 2 }));
        assert_eq!(err.to_string(), "argument 2 is empty");
    }

    #[test]
    fn rejects_malformed_input() {
        let err = validate(&["not-a-url-at-all"]).unwrap_err();
        assert!(matches!(err, TargetError::Malformed { .. }), "{err}");
    }

    #[test]
    fn one_bad_entry_rejects_the_whole_list() {
        assert!(validate(&["https://example.com", "invalid-url"]).is_err());
    }
}
