use regex::Regex;

/// Fraction of the latency threshold under which a failed time match is recovered.
pub const LATENCY_RECOVERY_FACTOR: f64 = 0.7;

/// An expectation compiled from a configured pattern string.
#[derive(Debug)]
pub enum Expectation<'a> {
    Regex(Regex),
    /// The pattern did not compile as a regex and is matched as plain text.
    Literal(&'a str),
}

impl<'a> Expectation<'a> {
    // Business rule: a pattern that is not a valid regex still counts, as a substring.
    pub fn compile(pattern: &'a str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => Expectation::Regex(regex),
            Err(e) => {
                log::debug!("Pattern {pattern:?} is not a valid regex, matching literally: {e}");
                Expectation::Literal(pattern)
            }
        }
    }

    pub fn is_met_by(&self, haystack: &str) -> bool {
        match self {
            Expectation::Regex(regex) => regex.is_match(haystack),
            Expectation::Literal(text) => haystack.contains(text),
        }
    }
}

/// Whether `haystack` satisfies an optional pattern. No pattern is always a match.
pub fn pattern_matches(pattern: Option<&str>, haystack: &str) -> bool {
    pattern.is_none_or(|p| Expectation::compile(p).is_met_by(haystack))
}

/// Whether the measured latency satisfies the threshold, boundary included,
/// with the recovery rule applied on top.
pub fn latency_matches(elapsed: f64, threshold: f64) -> bool {
    recover_borderline(elapsed <= threshold, elapsed, threshold)
}

/// Business rule carried over from the collector: a time mismatch is flipped back to a
/// match when the elapsed time sits under 70% of the threshold. It only ever turns a
/// mismatch into a match, never the other way around.
pub fn recover_borderline(matched: bool, elapsed: f64, threshold: f64) -> bool {
    matched || elapsed < threshold * LATENCY_RECOVERY_FACTOR
}
