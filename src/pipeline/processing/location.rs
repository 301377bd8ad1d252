use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::GeocodePolicy;
use crate::pipeline::processing::relaxation::Relaxation;

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[(\[].*?[)\]]").expect("bracket pattern is valid"));
static STRIPPED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[0-9()&*.,"”“'’]+"#).expect("strip pattern is valid"));
static SPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("space pattern is valid"));
static HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s?-\s?").expect("hyphen pattern is valid"));
static EN_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s?–\s?").expect("dash pattern is valid"));

/// Word tokens of one row's location, in field order.
///
/// Fields are concatenated coarse to specific, so the trailing tokens belong
/// to the last location column. Relaxation drops tokens from the end, which
/// only makes sense if callers keep that ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationQuery {
    tokens: Vec<String>,
}

impl LocationQuery {
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Query variants, most specific first.
    pub fn variants(&self) -> Relaxation<'_> {
        Relaxation::new(&self.tokens)
    }
}

/// Normalizes the three location cells of a row into a `LocationQuery`.
pub struct LocationBuilder<'a> {
    policy: &'a GeocodePolicy,
}

impl<'a> LocationBuilder<'a> {
    pub fn new(policy: &'a GeocodePolicy) -> Self {
        Self { policy }
    }

    pub fn build(&self, fields: [&str; 3]) -> LocationQuery {
        let joined = fields
            .iter()
            .map(|field| self.present(field))
            .collect::<Vec<_>>()
            .join(" ")
            .replace(['\n', '\r'], "");

        let text = BRACKETED.replace_all(&joined, "");
        let text = STRIPPED_CHARS.replace_all(&text, "").replace('/', " ");
        let text = SPACE_RUN.replace_all(&text, " ");
        let text = HYPHEN.replace_all(text.trim(), "-");
        let text = EN_DASH.replace_all(&text, " ");

        LocationQuery::from_tokens(text.split_whitespace().map(str::to_string).collect())
    }

    fn present<'f>(&self, field: &'f str) -> &'f str {
        if field == self.policy.missing_value {
            ""
        } else {
            field
        }
    }
}
