//! Prompts travel between pages as a `prompt` query parameter.

use anyhow::{Result, Context as AnyhowContext, anyhow};
use url::Url;

pub const PROMPT_PARAM: &str = "prompt";

/// Appends the prompt to `base`, replacing any prompt already present.
pub fn encode_share_link(base: &str, prompt: &str) -> Result<String> {
    let mut url = Url::parse(base)
        .with_context(|| format!("Invalid share link base {}", base))?;
    let kept: Vec<(String, String)> = url.query_pairs()
        .filter(|(k, _)| k != PROMPT_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(PROMPT_PARAM, prompt);
    }
    Ok(url.into())
}

pub fn decode_share_link(link: &str) -> Result<String> {
    let url = Url::parse(link)
        .with_context(|| format!("Invalid share link {}", link))?;
    url.query_pairs()
        .find(|(k, _)| k == PROMPT_PARAM)
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| anyhow!("Share link has no {} parameter", PROMPT_PARAM))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_link_carries_prompt() {
        let link = encode_share_link("https://flowgen.example.com/dashboard", "Get the dolar rate & notify").unwrap();
        assert!(link.starts_with("https://flowgen.example.com/dashboard?prompt="));
        assert!(!link.contains(' '));
        assert_eq!(decode_share_link(&link).unwrap(), "Get the dolar rate & notify");
    }

    #[test]
    fn test_existing_prompt_is_replaced() {
        let link = encode_share_link("https://flowgen.example.com/?tab=1&prompt=old", "new").unwrap();
        assert_eq!(link, "https://flowgen.example.com/?tab=1&prompt=new");
    }

    #[test]
    fn test_link_without_prompt_fails() {
        assert!(decode_share_link("https://flowgen.example.com/dashboard").is_err());
    }
}
