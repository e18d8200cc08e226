//! Static vocabulary tables for the imageboard tag dialect.
//!
//! The translation table and category sets are immutable data built once
//! at startup, so the formatter stays a pure function of (tags, tables).
//! The entries mirror the tag spellings the target imageboards expect.

use std::collections::{HashMap, HashSet};

/// Exact-match translations to imageboard spellings. Covers the common
/// multi-word anatomy, clothing, pose, and hair/eye-color vocabulary whose
/// target form is fixed rather than derivable by the generic slug rule.
const IMAGEBOARD_MAP: &[(&str, &str)] = &[
    // Body and anatomy
    ("large breasts", "large_breasts"),
    ("huge breasts", "huge_breasts"),
    ("small breasts", "small_breasts"),
    ("medium breasts", "medium_breasts"),
    ("flat chest", "flat_chest"),
    ("wide hips", "wide_hips"),
    ("thick thighs", "thick_thighs"),
    ("long legs", "long_legs"),
    ("big ass", "big_ass"),
    ("curvy", "curvy"),
    // Clothing and accessories
    ("school uniform", "school_uniform"),
    ("sailor uniform", "sailor_uniform"),
    ("gym uniform", "gym_uniform"),
    ("maid outfit", "maid_outfit"),
    ("bikini", "bikini"),
    ("one piece swimsuit", "one-piece_swimsuit"),
    ("lingerie", "lingerie"),
    ("stockings", "stockings"),
    ("thigh highs", "thigh_highs"),
    ("knee highs", "knee_highs"),
    ("pantyhose", "pantyhose"),
    ("high heels", "high_heels"),
    ("boots", "boots"),
    ("gloves", "gloves"),
    ("hair bow", "hair_bow"),
    ("hair ribbon", "hair_ribbon"),
    ("glasses", "glasses"),
    ("cat ears", "cat_ears"),
    ("animal ears", "animal_ears"),
    // Poses and expressions
    ("looking at viewer", "looking_at_viewer"),
    ("looking away", "looking_away"),
    ("looking back", "looking_back"),
    ("spread legs", "spread_legs"),
    ("arms up", "arms_up"),
    ("arms behind back", "arms_behind_back"),
    ("hand on hip", "hand_on_hip"),
    ("peace sign", "peace_sign"),
    ("wink", "wink"),
    ("blush", "blush"),
    ("smile", "smile"),
    ("open mouth", "open_mouth"),
    ("tongue out", "tongue_out"),
    // Hair and physical features
    ("long hair", "long_hair"),
    ("short hair", "short_hair"),
    ("twin tails", "twin_tails"),
    ("ponytail", "ponytail"),
    ("hair bun", "hair_bun"),
    ("ahoge", "ahoge"),
    ("bangs", "bangs"),
    ("side bangs", "side_bangs"),
    ("hair over one eye", "hair_over_one_eye"),
    ("red hair", "red_hair"),
    ("blonde hair", "blonde_hair"),
    ("brown hair", "brown_hair"),
    ("black hair", "black_hair"),
    ("blue hair", "blue_hair"),
    ("green hair", "green_hair"),
    ("pink hair", "pink_hair"),
    ("purple hair", "purple_hair"),
    ("white hair", "white_hair"),
    ("silver hair", "silver_hair"),
    ("red eyes", "red_eyes"),
    ("blue eyes", "blue_eyes"),
    ("green eyes", "green_eyes"),
    ("brown eyes", "brown_eyes"),
    ("yellow eyes", "yellow_eyes"),
    ("purple eyes", "purple_eyes"),
    ("pink eyes", "pink_eyes"),
    // Settings and backgrounds
    ("school", "school"),
    ("classroom", "classroom"),
    ("bedroom", "bedroom"),
    ("bathroom", "bathroom"),
    ("kitchen", "kitchen"),
    ("outdoors", "outdoors"),
    ("beach", "beach"),
    ("pool", "pool"),
    ("park", "park"),
    ("city", "city"),
    ("night", "night"),
    ("day", "day"),
    ("sunset", "sunset"),
    ("sunrise", "sunrise"),
    // Art style and quality
    ("anime", "anime"),
    ("manga", "manga"),
    ("realistic", "realistic"),
    ("photorealistic", "photorealistic"),
    ("detailed", "detailed"),
    ("high quality", "high_quality"),
    ("masterpiece", "masterpiece"),
    ("best quality", "best_quality"),
    ("official art", "official_art"),
    ("illustration", "illustration"),
    ("artwork", "artwork"),
    ("digital art", "digital_art"),
    ("traditional art", "traditional_art"),
];

/// Tags that flag content as NSFW for the enriched dialect's ordering.
const NSFW_INDICATORS: &[&str] = &[
    "nude", "naked", "topless", "bottomless", "underwear", "lingerie", "bikini", "swimsuit",
    "cleavage", "nipples", "areolae", "pussy", "penis", "ass", "buttocks", "thighs", "panties",
    "bra", "sex", "cum", "orgasm", "masturbation", "vibrator", "dildo", "bondage", "bdsm",
    "tentacles", "rape", "forced", "gangbang", "orgy", "futanari", "shemale", "transgender",
    "yaoi", "yuri", "hentai", "ecchi", "lewd", "nsfw", "explicit", "adult", "mature",
];

/// Quality descriptors.
const QUALITY_TAGS: &[&str] = &[
    "masterpiece", "best quality", "high quality", "detailed", "ultra detailed",
    "extremely detailed", "highly detailed", "amazing", "beautiful", "gorgeous", "stunning",
    "perfect", "flawless", "incredible", "outstanding", "exceptional", "professional",
    "official art", "promotional art",
];

/// Art style descriptors.
const STYLE_TAGS: &[&str] = &[
    "anime", "manga", "realistic", "photorealistic", "semi-realistic", "cartoon", "chibi",
    "sketch", "line art", "cel shading", "soft shading", "hard shading", "watercolor",
    "oil painting", "digital art", "traditional art", "concept art", "illustration", "cg",
    "3d", "2d", "pixiv", "danbooru", "gelbooru",
];

/// Substring keywords that classify a tag as clothing.
const CLOTHING_KEYWORDS: &[&str] = &[
    "uniform", "outfit", "clothes", "dress", "shirt", "skirt", "pants", "jacket", "coat",
    "hat", "shoes", "boots", "socks", "stockings", "gloves", "accessories",
];

/// Substring keywords that classify a tag as a pose.
const POSE_KEYWORDS: &[&str] = &[
    "sitting", "standing", "lying", "kneeling", "running", "walking", "dancing", "jumping",
    "flying", "pose", "position",
];

/// Substring keywords that classify a tag as a background/setting.
const BACKGROUND_KEYWORDS: &[&str] = &[
    "room", "school", "house", "building", "street", "park", "beach", "mountain", "forest",
    "sky", "cloud", "water", "background",
];

/// Immutable lookup tables for the imageboard dialect, built once.
pub struct Lexicon {
    translations: HashMap<&'static str, &'static str>,
    nsfw: HashSet<&'static str>,
    quality: HashSet<&'static str>,
    style: HashSet<&'static str>,
}

impl Lexicon {
    /// Build the lexicon from the static tables.
    pub fn new() -> Self {
        Self {
            translations: IMAGEBOARD_MAP.iter().copied().collect(),
            nsfw: NSFW_INDICATORS.iter().copied().collect(),
            quality: QUALITY_TAGS.iter().copied().collect(),
            style: STYLE_TAGS.iter().copied().collect(),
        }
    }

    /// Exact-match imageboard spelling for a display name, if fixed.
    pub fn translate(&self, name: &str) -> Option<&'static str> {
        self.translations.get(name).copied()
    }

    /// Whether a lowercased name is an NSFW indicator.
    pub fn is_nsfw(&self, lower: &str) -> bool {
        self.nsfw.contains(lower)
    }

    /// Whether a lowercased name is a quality descriptor.
    pub fn is_quality(&self, lower: &str) -> bool {
        self.quality.contains(lower)
    }

    /// Whether a lowercased name is a style descriptor.
    pub fn is_style(&self, lower: &str) -> bool {
        self.style.contains(lower)
    }

    /// Whether a lowercased name contains a clothing keyword.
    pub fn is_clothing(&self, lower: &str) -> bool {
        CLOTHING_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    /// Whether a lowercased name contains a pose keyword.
    pub fn is_pose(&self, lower: &str) -> bool {
        POSE_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    /// Whether a lowercased name contains a background keyword.
    pub fn is_background(&self, lower: &str) -> bool {
        BACKGROUND_KEYWORDS.iter().any(|k| lower.contains(k))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}
