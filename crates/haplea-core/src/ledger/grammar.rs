//! Monetary token grammar.
//!
//! Extracts amount tokens like `2.5 lei`, `14 ron`, or `1,20 lei` from a
//! text blob. Matching is case-sensitive and unit-literal; amounts in lei
//! and ron are not converted, they sum together downstream.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Optional decimal prefix (digits followed by `.` or `,`, or a bare `,`),
/// digits, whitespace, then the exact lowercase unit.
static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<amount>(?:[0-9]+[.,]|,)?[0-9]+)\s+(?P<unit>lei|ron)")
        .expect("amount pattern is valid")
});

/// Currency unit literal matched by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyUnit {
    Lei,
    Ron,
}

/// One matched amount, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryToken {
    /// The matched substring, as written.
    pub raw: String,
    /// Numeric amount with `,` normalized to `.`.
    pub amount: f64,
    pub unit: CurrencyUnit,
}

/// Scans `text` for the ordered sequence of non-overlapping amount tokens.
///
/// A line like `coffee 2x` contributes nothing; unparseable text is never an
/// error, it simply yields no token.
pub fn scan(text: &str) -> Vec<MonetaryToken> {
    AMOUNT
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str().to_string();
            let amount = caps
                .name("amount")?
                .as_str()
                .replace(',', ".")
                .parse::<f64>()
                .ok()?;
            let unit = match caps.name("unit")?.as_str() {
                "lei" => CurrencyUnit::Lei,
                _ => CurrencyUnit::Ron,
            };
            Some(MonetaryToken { raw, amount, unit })
        })
        .collect()
}

/// Sum of all matched amounts; `0.0` when nothing matches.
pub fn total(tokens: &[MonetaryToken]) -> f64 {
    tokens.iter().map(|t| t.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(text: &str) -> Vec<f64> {
        scan(text).iter().map(|t| t.amount).collect()
    }

    #[test]
    fn extracts_each_token_in_order() {
        let tokens = scan("bread 4 lei, butter 7.5 ron and 1,20 lei change");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].amount, 4.0);
        assert_eq!(tokens[0].unit, CurrencyUnit::Lei);
        assert_eq!(tokens[1].amount, 7.5);
        assert_eq!(tokens[1].unit, CurrencyUnit::Ron);
        assert!((tokens[2].amount - 1.2).abs() < 1e-9);
        assert_eq!(tokens[2].unit, CurrencyUnit::Lei);
    }

    #[test]
    fn total_is_order_independent() {
        let forward = total(&scan("2.5 lei then 14 ron"));
        let backward = total(&scan("14 ron then 2.5 lei"));
        assert!((forward - backward).abs() < 1e-9);
        assert!((forward - 16.5).abs() < 1e-9);
    }

    #[test]
    fn comma_decimal_normalizes() {
        assert!((amounts("1,20 lei")[0] - 1.2).abs() < 1e-9);
    }

    #[test]
    fn bare_comma_prefix_parses_as_fraction() {
        assert!((amounts(",20 lei")[0] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn unit_matching_is_case_sensitive() {
        assert!(scan("10 LEI").is_empty());
        assert!(scan("10 Ron").is_empty());
    }

    #[test]
    fn unit_requires_preceding_whitespace() {
        assert!(scan("10lei").is_empty());
    }

    #[test]
    fn no_matches_means_zero_total() {
        let tokens = scan("coffee and a walk in the park");
        assert!(tokens.is_empty());
        assert_eq!(total(&tokens), 0.0);
    }

    #[test]
    fn negative_sign_is_not_part_of_the_amount() {
        // The grammar has no sign; "-5 lei" matches as 5.
        assert_eq!(amounts("-5 lei"), vec![5.0]);
    }

    #[test]
    fn raw_preserves_the_matched_text() {
        let tokens = scan("paid 12.50 lei today");
        assert_eq!(tokens[0].raw, "12.50 lei");
    }
}
