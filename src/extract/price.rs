//! Session price lookup
//!
//! Profiles publish prices only as free text in the fees block, e.g.
//! "Individual Sessions $150 Couple Sessions $180 Pay By: Cash, Cheque". The
//! `PriceSource` trait lets a structured source replace the text scan without
//! touching the extractor's callers.

use crate::extract::locate::{first_text, FEES};
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

static INDIVIDUAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Individual Sessions?\s*\$\s*([0-9]+)").expect("valid individual price regex")
});

static COUPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Couples? Sessions?\s*\$\s*([0-9]+)").expect("valid couple price regex")
});

/// Where session prices come from
pub trait PriceSource {
    /// Price of an individual session, digits only
    fn individual(&self, document: &Html) -> Option<String>;

    /// Price of a couple session, digits only
    fn couple(&self, document: &Html) -> Option<String>;
}

/// Pattern match over the fees block text
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeTextFees;

impl PriceSource for FreeTextFees {
    fn individual(&self, document: &Html) -> Option<String> {
        capture_price(&INDIVIDUAL_RE, &first_text(document, &FEES)?)
    }

    fn couple(&self, document: &Html) -> Option<String> {
        capture_price(&COUPLE_RE, &first_text(document, &FEES)?)
    }
}

fn capture_price(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|amount| amount.as_str().to_string())
}
