//! Share link unwrapping
//!
//! Deck builders share links that are often wrapped by the platform they were
//! posted on, e.g. `https://l.facebook.com/l.php?u=<link>` or a generic
//! redirector using `?url=<link>`. The innermost link carries the recipe code
//! in its `deck` query parameter.

use optcg_common::{DeckError, Result};
use std::borrow::Cow;
use std::collections::HashMap;

/// Substring marking links wrapped by Facebook's outbound redirector
///
/// Matched anywhere in the decoded link text, so an unrelated link that merely
/// mentions `facebook` takes the `u` branch as well.
const FACEBOOK_MARKER: &str = "facebook";
const FACEBOOK_LINK_PARAM: &str = "u";
const DEFAULT_LINK_PARAM: &str = "url";
const RECIPE_PARAM: &str = "deck";

/// Maximum number of wrapping links peeled off before giving up
pub const MAX_LINK_DEPTH: usize = 16;

/// Resolve a (possibly nested) share link to its recipe code
pub fn resolve_recipe_code(share_url: &str) -> Result<String> {
    let mut current = share_url.to_string();

    for depth in 0..=MAX_LINK_DEPTH {
        let decoded = percent_decode(&current);
        let link_param = embedded_link_param(&decoded);
        let mut params = parse_query(&decoded);

        if let Some(inner) = take_first(&mut params, link_param) {
            log::debug!("Unwrapping embedded link at depth {}: {}", depth, inner);
            current = inner;
            continue;
        }

        return take_first(&mut params, RECIPE_PARAM).ok_or_else(|| {
            DeckError::MalformedLink(format!("no '{}' parameter in {}", RECIPE_PARAM, decoded))
        });
    }

    Err(DeckError::LinkTooDeep {
        depth: MAX_LINK_DEPTH,
    })
}

/// Name of the query parameter that may hold a wrapped link
fn embedded_link_param(link: &str) -> &'static str {
    if link.contains(FACEBOOK_MARKER) {
        FACEBOOK_LINK_PARAM
    } else {
        DEFAULT_LINK_PARAM
    }
}

fn take_first(params: &mut HashMap<String, Vec<String>>, key: &str) -> Option<String> {
    params
        .remove(key)
        .and_then(|values| values.into_iter().next())
}

/// Decode `%XX` escapes, leaving malformed escapes as they are and
/// replacing invalid UTF-8
fn percent_decode(input: &str) -> String {
    let bytes = urlencoding::decode_binary(input.as_bytes());
    match String::from_utf8_lossy(&bytes) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

/// Parse the query part of a link into name -> values
///
/// The query is the text between the first `?` and the first `#`. Pairs
/// without `=` or with an empty value are dropped; `+` decodes to a space.
fn parse_query(link: &str) -> HashMap<String, Vec<String>> {
    let without_fragment = link.split('#').next().unwrap_or_default();
    let mut params: HashMap<String, Vec<String>> = HashMap::new();

    let Some((_, query)) = without_fragment.split_once('?') else {
        return params;
    };

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        let key = percent_decode(&key.replace('+', " "));
        let value = percent_decode(&value.replace('+', " "));
        params.entry(key).or_default().push(value);
    }

    params
}
