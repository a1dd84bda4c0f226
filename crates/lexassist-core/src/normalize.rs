//! Query text normalisation.
//!
//! Two forms are used throughout the pipeline:
//!
//! - the *normalised query*: lower-cased and whitespace-trimmed, used as the
//!   cache key and for substring keyword matching
//! - the *word sequence*: the normalised query split on anything that is not
//!   alphanumeric or an apostrophe, used for whole-word and phrase matching
//!
//! "  Can I sue?  " → normalised `"can i sue?"`, words `["can", "i", "sue"]`

/// Lower-case and trim a raw query.
///
/// Returns `None` when nothing but whitespace remains.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Split text into lower-case words.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `phrase` occurs in `haystack` as a run of whole words.
///
/// Both sides are split with [`words`], so punctuation and spacing
/// differences are ignored: `"can i"` matches `"Can I charge them?"` but
/// `"writ"` does not match `"written"`.
pub fn contains_phrase(haystack: &[String], phrase: &str) -> bool {
    let needle = words(phrase);
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}
