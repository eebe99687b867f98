// Square bracket flags
pub const START_MARKER: &'static str = "[start]";
pub const CHECKPOINT_MARKER: &'static str = "[checkpoint]";
pub const LOOP_MARKER: &'static str = "[loop]";
pub const MEMORY_MARKER: &'static str = "[memory]";
pub const DEATH_MARKER: &'static str = "[death]";
pub const ENDPOINT_MARKER: &'static str = "[end]";
pub const BLACK_SCREEN_MARKER: &'static str = "[black]";
pub const REWIND_MARKER: &'static str = "[rewind]";
pub const ANCHOR_MARKER: &'static str = "[anchor]";
pub const HIDDEN_MARKER: &'static str = "[hidden]";
pub const EARLY_DISPLAY_MARKER: &'static str = "[early]";
pub const CARD_MARKER: &'static str = "[card]";
pub const BGM_MARKER: &'static str = "[bgm]";

// Option family markers, any of which classifies a node as a Choice
pub const OPTION_MARKER: &'static str = "[option]";
pub const HOTSPOT_MARKER: &'static str = "[hotspot]";
pub const BUBBLE_MARKER: &'static str = "[bubble]";

// Guillemet ad markers
pub const AD_MARKER: &'static str = "《AD》";
pub const AD_FULLSCREEN_MARKER: &'static str = "《AD15》";
pub const AD_REWARDED_MARKER: &'static str = "《AD30》";

// Prefix on an effect that marks it as accumulative across sessions
pub const ACCUMULATIVE_PREFIX: &'static str = "A:";

// Entities skipped during import
pub const IGNORE_MARKER: &'static str = "[ignore]";
pub const DRAFT_MARKER: &'static str = "[draft]";
pub const SECTION_KIND: &'static str = "section";
pub const IMAGE_KIND: &'static str = "image";
pub const TOPIC_KIND: &'static str = "topic";

/// Comparison operator symbols, two-character symbols before their
/// one-character prefixes so that a search never matches a partial operator.
pub const COMPARE_SYMBOLS: [&'static str; 6] = ["==", "!=", ">=", "<=", ">", "<"];

/// Arithmetic effect operator characters, searched after the `=` assignment.
pub const EFFECT_SYMBOLS: [char; 5] = ['=', '+', '-', '*', '/'];

/// Variable names that belong to the shop system rather than chapter state.
pub const SHOP_VARIABLES: [&'static str; 4] = ["gold", "金币", "coins", "tickets"];
