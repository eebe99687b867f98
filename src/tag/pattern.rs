//! Compiled patterns for every tag in the vocabulary.
//!
//! The per-kind parsers apply these in a fixed, documented order against
//! a mutable remaining-text cursor. That order is part of the contract:
//! each successful match is removed before the next pattern runs, so a more
//! specific pattern (an ad marker, a probability marker) must always be
//! tried before the generic scan that would otherwise swallow its text.

use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).unwrap());
    };
}

// Square bracket flags
pattern!(START, r"\[start\]");
pattern!(CHECKPOINT_NAMED, r"\[checkpoint:([^\]]+)\]");
pattern!(CHECKPOINT, r"\[checkpoint\]");
pattern!(LOOP, r"\[loop\]");
pattern!(MEMORY, r"\[memory\]");
pattern!(DEATH, r"\[death\]");
pattern!(ENDPOINT, r"\[end\]");
pattern!(BLACK_SCREEN, r"\[black\]");
pattern!(REWIND, r"\[rewind\]");
pattern!(ANCHOR, r"\[anchor\]");
pattern!(HIDDEN, r"\[hidden\]");
pattern!(EARLY_DISPLAY, r"\[early\]");
pattern!(CARD, r"\[card\]");
pattern!(BGM, r"\[bgm\]");
pattern!(OPTION, r"\[option\]");
pattern!(HOTSPOT, r"\[hotspot\]");
pattern!(BUBBLE, r"\[bubble\]");
pattern!(IGNORE, r"\[ignore\]");
pattern!(DRAFT, r"\[draft\]");

// Parameterized square bracket markers
pattern!(SAY, r"\[say:([^\]]*)\]");
pattern!(TRACK, r"\[track:([^\]]*)\]");
pattern!(VARIABLE_BAR, r"\[bar:([^\]]*)\]");
pattern!(SHOP, r"\[shop:([^\]]*)\]");
pattern!(TIP, r"\[tip:([^\]]*)\]");
pattern!(JUMP, r"\[jump:([^\]]*)\]");
pattern!(VOLUME, r"\[vol:([^\]]*)\]");
pattern!(TIER, r"\[tier:([^\]]*)\]");
pattern!(ACHIEVEMENT, r"\[achieve:([^\]]*)\]");
pattern!(OVERLAY, r"\[overlay:([^\]]*)\]");
pattern!(TASK, r"\[task\((\d+)\)\]");

// Random time window on video nodes, `(min-max)` with two numbers
pattern!(RANDOM_WINDOW, r"\((\d+(?:\.\d+)?)-(\d+(?:\.\d+)?)\)");

// Payload validation
pattern!(HEX_COLOR, r"^#[0-9a-fA-F]{6}$");

// Guillemet ad markers, the parameterized forms before the bare one
pattern!(AD_FULLSCREEN, "《AD15》");
pattern!(AD_REWARDED, "《AD30》");
pattern!(AD_BARE, "《AD》");

// Probability markers in strict priority order: count-bounded, then simple
// percentage, then variable expression. Mutually exclusive per node.
pattern!(PROBABILITY_COUNT, r"《(\d+(?:\.\d+)?)%\*(\d+)》");
pattern!(PROBABILITY_PERCENT, r"《(\d+(?:\.\d+)?)%》");
pattern!(PROBABILITY_EXPRESSION, "《([^《》%]+)%》");

// Bare-number guillemet: a random weight on video nodes. Must not match
// percentage-shaped content, which the pattern excludes by construction.
pattern!(RANDOM_WEIGHT, r"《(\d+(?:\.\d+)?)》");

// Generic family scans, applied last within their pipelines
pattern!(GUILLEMET, "《([^《》]*)》");
pattern!(EFFECT, "<([^<>]*)>");
pattern!(DYNAMIC_TEXT, r"\{([^{}]*)\}");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_weight_does_not_match_percentage_shaped_content() {
        assert!(RANDOM_WEIGHT.is_match("《30》"));
        assert!(!RANDOM_WEIGHT.is_match("《30%》"));
    }

    #[test]
    fn probability_patterns_do_not_overlap_between_forms() {
        assert!(PROBABILITY_COUNT.is_match("《30%*3》"));
        assert!(!PROBABILITY_PERCENT.is_match("《30%*3》"));

        assert!(PROBABILITY_PERCENT.is_match("《30%》"));
        assert!(!PROBABILITY_COUNT.is_match("《30%》"));

        assert!(PROBABILITY_EXPRESSION.is_match("《luck%》"));
        assert!(!PROBABILITY_COUNT.is_match("《luck%》"));
        assert!(!PROBABILITY_PERCENT.is_match("《luck%》"));
    }

    #[test]
    fn bare_ad_marker_does_not_match_parameterized_forms() {
        assert!(!AD_BARE.is_match("《AD15》"));
        assert!(!AD_BARE.is_match("《AD30》"));
        assert!(AD_BARE.is_match("《AD》"));
    }

    #[test]
    fn named_checkpoint_requires_a_name() {
        assert!(CHECKPOINT_NAMED.is_match("[checkpoint:harbor]"));
        assert!(!CHECKPOINT_NAMED.is_match("[checkpoint]"));
    }

    #[test]
    fn random_window_captures_both_bounds() {
        let caps = RANDOM_WINDOW.captures("(1.5-4)").unwrap();

        assert_eq!(caps.get(1).unwrap().as_str(), "1.5");
        assert_eq!(caps.get(2).unwrap().as_str(), "4");
    }
}
