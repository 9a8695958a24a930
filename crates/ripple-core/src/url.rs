//! Provider URL grammar: `scheme://target?key=value&key=value`.
//!
//! Ported field-for-field from `lcm_parse_url` in
//! `original_source/lcm/lcm.c`: split on `://`, then on `?`, then the
//! argument string on `[,&]`, then each pair on `=`. Edge cases match
//! the original: a missing target segment is `None`, not `Some("")`,
//! and an argument with no `=` is dropped rather than rejected
//! (forward compatibility — unrecognized/malformed arguments are
//! ignored, per spec.md §4.F).

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::Error;

/// The default URL used when construction is asked for an empty one
/// and `RIPPLE_DEFAULT_URL` is unset.
pub const DEFAULT_URL: &str = "udpm://239.255.76.67:7667";

/// Environment variable consulted before [`DEFAULT_URL`] when the
/// caller passes an empty URL.
pub const DEFAULT_URL_ENV: &str = "RIPPLE_DEFAULT_URL";

/// A parsed provider URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub provider: String,
    pub target: Option<String>,
    pub args: HashMap<String, String>,
}

impl FromStr for ParsedUrl {
    type Err = Error;

    fn from_str(url: &str) -> Result<Self, Error> {
        let resolved;
        let url = if url.is_empty() {
            resolved = std::env::var(DEFAULT_URL_ENV).unwrap_or_else(|_| DEFAULT_URL.to_string());
            resolved.as_str()
        } else {
            url
        };

        let (provider, rest) = url
            .split_once("://")
            .ok_or_else(|| Error::Url(format!("{url:?} has no scheme separator \"://\"")))?;
        if provider.is_empty() {
            return Err(Error::Url(format!("{url:?} has an empty scheme")));
        }

        let (target_part, query) = match rest.split_once('?') {
            Some((t, q)) => (t, Some(q)),
            None => (rest, None),
        };

        let target = if target_part.is_empty() {
            None
        } else {
            Some(target_part.to_string())
        };

        let mut args = HashMap::new();
        if let Some(query) = query {
            for pair in query.split(['&', ',']) {
                if pair.is_empty() {
                    continue;
                }
                match pair.split_once('=') {
                    Some((k, v)) if !k.is_empty() => {
                        args.insert(k.to_string(), v.to_string());
                    }
                    // No key, or no `=` at all: skip, matching
                    // lcm_parse_url's `goto cont`.
                    _ => continue,
                }
            }
        }

        Ok(ParsedUrl {
            provider: provider.to_string(),
            target,
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scheme_target_and_args() {
        let url: ParsedUrl = "udpm://239.255.76.67:7667?ttl=1".parse().unwrap();
        assert_eq!(url.provider, "udpm");
        assert_eq!(url.target.as_deref(), Some("239.255.76.67:7667"));
        assert_eq!(url.args.get("ttl"), Some(&"1".to_string()));
    }

    #[test]
    fn empty_target_is_none() {
        let url: ParsedUrl = "udpm://".parse().unwrap();
        assert_eq!(url.target, None);
        assert!(url.args.is_empty());
    }

    #[test]
    fn multiple_args_split_on_ampersand_and_comma() {
        let url: ParsedUrl = "udpm://host?a=1&b=2,c=3".parse().unwrap();
        assert_eq!(url.args.len(), 3);
        assert_eq!(url.args.get("a"), Some(&"1".to_string()));
        assert_eq!(url.args.get("b"), Some(&"2".to_string()));
        assert_eq!(url.args.get("c"), Some(&"3".to_string()));
    }

    #[test]
    fn malformed_arg_without_equals_is_ignored() {
        let url: ParsedUrl = "udpm://host?justakey&ttl=1".parse().unwrap();
        assert_eq!(url.args.len(), 1);
        assert_eq!(url.args.get("ttl"), Some(&"1".to_string()));
    }

    #[test]
    fn missing_scheme_separator_is_rejected() {
        assert!("bogus".parse::<ParsedUrl>().is_err());
    }

    #[test]
    fn empty_url_falls_back_to_default() {
        std::env::remove_var(DEFAULT_URL_ENV);
        let url: ParsedUrl = "".parse().unwrap();
        assert_eq!(url.provider, "udpm");
        assert_eq!(url.target.as_deref(), Some("239.255.76.67:7667"));
    }

    #[test]
    fn empty_url_honors_env_override() {
        std::env::set_var(DEFAULT_URL_ENV, "file:///tmp/log.ripple");
        let url: ParsedUrl = "".parse().unwrap();
        std::env::remove_var(DEFAULT_URL_ENV);
        assert_eq!(url.provider, "file");
        assert_eq!(url.target.as_deref(), Some("/tmp/log.ripple"));
    }
}
