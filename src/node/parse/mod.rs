//! Per-kind extraction pipelines.
//!
//! Each kind runs its own ordered list of tag extractions against the
//! node's text. The order is part of the contract, not incidental: every
//! successful extraction consumes text the next step depends on. A tag
//! that fails its local grammar leaves the field at its default and never
//! aborts the node.

pub(crate) mod choice;
pub(crate) mod other;
pub(crate) mod video;

use tracing::debug;

use crate::{
    node::AdType,
    tag::{parse_condition, parse_effect, pattern, Condition, Effect, TagCursor},
};

/// Strip every remaining guillemet and keep the ones that parse as
/// conditions, in source order.
fn collect_conditions(cursor: &mut TagCursor) -> Vec<Condition> {
    cursor
        .strip_all(&pattern::GUILLEMET)
        .into_iter()
        .filter_map(|tag| {
            let content = tag.group(1).unwrap_or("");

            match parse_condition(content) {
                Ok(condition) => Some(condition),
                Err(error) => {
                    debug!(tag = content, %error, "dropping unparsable condition tag");
                    None
                }
            }
        })
        .collect()
}

/// Strip every angle bracket span and keep the ones that parse as effects.
fn collect_effects(cursor: &mut TagCursor) -> Vec<Effect> {
    cursor
        .strip_all(&pattern::EFFECT)
        .into_iter()
        .filter_map(|tag| {
            let content = tag.group(1).unwrap_or("");

            match parse_effect(content) {
                Ok(effect) => Some(effect),
                Err(error) => {
                    debug!(tag = content, %error, "dropping unparsable effect tag");
                    None
                }
            }
        })
        .collect()
}

/// Strip an ad marker, parameterized forms before the bare one.
///
/// The count-15 form forces a fullscreen ad and the count-30 form a
/// rewarded one. The bare marker only sets the requirement flag: the ad
/// type stays rewarded if it already was, otherwise the fullscreen
/// default stands. That convention is preserved from the original
/// authoring tool exactly as documented.
fn strip_ad_marker(cursor: &mut TagCursor, require_ad: &mut bool, ad_type: &mut AdType) {
    if cursor.strip(&pattern::AD_FULLSCREEN).is_some() {
        *require_ad = true;
        *ad_type = AdType::Fullscreen;
    } else if cursor.strip(&pattern::AD_REWARDED).is_some() {
        *require_ad = true;
        *ad_type = AdType::Rewarded;
    } else if cursor.strip(&pattern::AD_BARE).is_some() {
        *require_ad = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::CompareOp;

    #[test]
    fn adjacent_conditions_parse_in_source_order_with_trimmed_operands() {
        let mut cursor = TagCursor::new("《A==1》《B>2》");
        let conditions = collect_conditions(&mut cursor);

        assert_eq!(conditions.len(), 2);

        assert_eq!(&conditions[0].variable, "A");
        assert_eq!(conditions[0].operator, CompareOp::Eq);
        assert_eq!(&conditions[0].value, "1");

        assert_eq!(&conditions[1].variable, "B");
        assert_eq!(conditions[1].operator, CompareOp::Gt);
        assert_eq!(&conditions[1].value, "2");
    }

    #[test]
    fn guillemets_that_are_not_conditions_are_dropped_not_fatal() {
        let mut cursor = TagCursor::new("《not a condition》《A>1》");
        let conditions = collect_conditions(&mut cursor);

        assert_eq!(conditions.len(), 1);
        assert_eq!(&conditions[0].variable, "A");
    }

    #[test]
    fn count_15_ad_marker_forces_a_fullscreen_ad() {
        let mut cursor = TagCursor::new("《AD15》 buy in");
        let mut require_ad = false;
        let mut ad_type = AdType::Rewarded;

        strip_ad_marker(&mut cursor, &mut require_ad, &mut ad_type);

        assert!(require_ad);
        assert_eq!(ad_type, AdType::Fullscreen);
    }

    #[test]
    fn count_30_ad_marker_forces_a_rewarded_ad() {
        let mut cursor = TagCursor::new("《AD30》 buy in");
        let mut require_ad = false;
        let mut ad_type = AdType::Fullscreen;

        strip_ad_marker(&mut cursor, &mut require_ad, &mut ad_type);

        assert!(require_ad);
        assert_eq!(ad_type, AdType::Rewarded);
    }

    #[test]
    fn bare_ad_marker_keeps_an_already_rewarded_type() {
        let mut cursor = TagCursor::new("《AD》 buy in");
        let mut require_ad = false;
        let mut ad_type = AdType::Rewarded;

        strip_ad_marker(&mut cursor, &mut require_ad, &mut ad_type);

        assert!(require_ad);
        assert_eq!(ad_type, AdType::Rewarded);
    }

    #[test]
    fn bare_ad_marker_leaves_the_fullscreen_default_otherwise() {
        let mut cursor = TagCursor::new("《AD》 buy in");
        let mut require_ad = false;
        let mut ad_type = AdType::Fullscreen;

        strip_ad_marker(&mut cursor, &mut require_ad, &mut ad_type);

        assert!(require_ad);
        assert_eq!(ad_type, AdType::Fullscreen);
    }
}
