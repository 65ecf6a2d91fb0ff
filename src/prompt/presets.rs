//! Deterministic prompt helpers: keyword suggestions, the "magic prompt"
//! expansion and the template catalog.
//!
//! All of this is static data plus substring matching on the lowercased
//! input. Nothing here calls out to a model.

use serde::Serialize;

use super::model::{ActionStep, Choices, Draft, DraftPatch};

// Shared option values, reused across suggestions, templates and magic prompts.
const CAM_MEDIUM: &str = "medium shot with rule of thirds composition, balancing character presence with environmental context";
const CAM_WIDE: &str = "establishing wide shot with deep focus, revealing the spatial relationship between characters and environment";
const CAM_CLOSE_UP: &str = "intimate close-up with shallow depth of field, isolating emotional expression and creating psychological proximity";
const CAM_LOW_ANGLE: &str = "low angle shot with upward perspective, creating psychological dominance and heroic framing";
const CAM_TILT: &str = "dynamic tilt shot with vertical movement, creating disorientation or dramatic emphasis";
const CAM_HANDHELD: &str = "handheld shot with natural camera shake, creating documentary realism and emotional immediacy";

const LIGHT_DAYLIGHT: &str = "natural daylight with soft diffusion, creating warm and inviting atmosphere with gentle shadow falloff";
const LIGHT_STUDIO: &str = "studio lighting with three-point setup, ensuring clean and professional presentation with controlled shadows";
const LIGHT_HIGH_CONTRAST: &str = "high contrast lighting with strong shadow definition, creating dramatic and moody atmosphere with bold chiaroscuro";
const LIGHT_NEON: &str = "neon accent lighting with vibrant colors, creating futuristic and energetic atmosphere with bold color contrasts";
const LIGHT_CANDLE: &str = "candlelight with warm flickering quality, creating intimate and romantic atmosphere with natural movement";
const LIGHT_GOLDEN_HOUR: &str = "golden hour lighting with warm color temperature, creating romantic and nostalgic mood with elongated shadows";

const STYLE_COMMERCIAL: &str = "commercial style with high production values and polished aesthetics, emphasizing brand appeal and professional quality";
const STYLE_CINEMATIC: &str = "cinematic style with film grain texture and color grading, evoking classic Hollywood production values and narrative depth";
const STYLE_CYBERPUNK: &str = "cyberpunk style with neon lighting and futuristic aesthetics, creating high-tech and energetic atmosphere";
const STYLE_CONTEMPORARY: &str = "contemporary style with clean lines and modern design elements, emphasizing sophistication and current trends";
const STYLE_CORPORATE: &str = "corporate style with professional presentation and business-appropriate aesthetics, emphasizing trust and reliability";
const STYLE_DOCUMENTARY: &str = "documentary style with verité aesthetics and natural lighting, creating authentic and unpolished realism";
const STYLE_ROMANTIC: &str = "romantic style with soft lighting and warm color palette, creating intimate and emotionally resonant atmosphere";
const STYLE_ACTION: &str = "action-packed style with dynamic movement and kinetic energy, creating excitement and adrenaline-fueled atmosphere";

const SFX_PROFESSIONAL: &str = "subtle ambient sounds, professional environment";
const SFX_DRAMATIC: &str = "dramatic ambient sounds, atmospheric audio";
const MUSIC_UPBEAT: &str = "upbeat, energetic background music";
const MUSIC_DRAMATIC: &str = "dramatic, tension-building";

const NEG_LOW_QUALITY: &str = "blurry, low quality, distorted";
const NEG_CARTOONISH: &str = "cartoonish, animated, unrealistic";
const NEG_ARTIFICIAL: &str = "artificial, synthetic, fake-looking";
const NEG_OVEREXPOSED: &str = "overexposed, too bright";
const NEG_HARSH: &str = "harsh shadows, unflattering lighting";

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// Suggests field values for an initial prompt.
///
/// Matching is plain substring search on the lowercased prompt, so short
/// keywords such as `ad` also hit inside longer words.
pub fn suggest(initial_prompt: &str) -> DraftPatch {
    let mut patch = DraftPatch::new();
    let prompt = initial_prompt.trim().to_lowercase();
    if prompt.is_empty() {
        return patch;
    }

    let is_commercial = contains_any(&prompt, &["ad", "commercial"]);
    if is_commercial {
        patch.scene = Some("Professional commercial setting with clean, modern environment".into());
        patch.style = Some(Choices::from([STYLE_COMMERCIAL]));
        patch.camera = Some(Choices::from([CAM_MEDIUM]));
        patch.lighting = Some(Choices::from([LIGHT_STUDIO]));
    } else if contains_any(&prompt, &["nature", "outdoor"]) {
        patch.scene = Some("Natural outdoor environment with beautiful landscapes".into());
        patch.style = Some(Choices::from([STYLE_CINEMATIC]));
        patch.camera = Some(Choices::from([CAM_WIDE]));
        patch.lighting = Some(Choices::from([LIGHT_DAYLIGHT]));
    } else if contains_any(&prompt, &["dramatic", "emotional"]) {
        patch.style = Some(Choices::from(["dramatic, tension-building"]));
        patch.lighting = Some(Choices::from([LIGHT_HIGH_CONTRAST]));
        patch.camera = Some(Choices::from([CAM_CLOSE_UP]));
    }

    if contains_any(&prompt, &["auto parts", "car"]) {
        patch.character = Some(
            "Professional mechanic or car enthusiast, wearing work clothes, confident and knowledgeable"
                .into(),
        );
    } else if contains_any(&prompt, &["tech", "software"]) {
        patch.character = Some(
            "Modern professional, wearing business casual attire, tech-savvy and innovative".into(),
        );
    }

    if is_commercial {
        patch.background_music = Some(Choices::from([MUSIC_UPBEAT]));
        patch.sound_effects = Some(Choices::from([SFX_PROFESSIONAL]));
    }

    patch
}

// =============================================================================
// MAGIC PROMPT
// =============================================================================

/// Business categories recognised by the magic prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    AutoMechanic,
    Restaurant,
    Retail,
    Technology,
    RealEstate,
    Fitness,
    General,
}

impl BusinessType {
    pub fn detect(prompt: &str) -> Self {
        let p = prompt.to_lowercase();
        if contains_any(&p, &["auto", "mechanic", "car"]) {
            Self::AutoMechanic
        } else if contains_any(&p, &["restaurant", "food", "cafe"]) {
            Self::Restaurant
        } else if contains_any(&p, &["clothing", "fashion", "store"]) {
            Self::Retail
        } else if contains_any(&p, &["tech", "software", "app"]) {
            Self::Technology
        } else if contains_any(&p, &["real estate", "property"]) {
            Self::RealEstate
        } else if contains_any(&p, &["fitness", "gym", "health"]) {
            Self::Fitness
        } else {
            Self::General
        }
    }

    fn scene(&self, name: &str) -> String {
        match self {
            Self::AutoMechanic => format!("Professional auto repair shop with modern equipment, clean work bays, and organized tool storage. The {name} garage features bright LED lighting, hydraulic lifts, and a customer waiting area with automotive magazines and refreshments."),
            Self::Restaurant => format!("Cozy restaurant interior with warm lighting, wooden tables, and local artwork. The {name} dining area features an open kitchen concept, fresh ingredients on display, and comfortable seating arrangements."),
            Self::Retail => format!("Modern retail store with clean displays, organized product sections, and customer-friendly layout. The {name} shop features bright lighting, clear signage, and attractive product presentations."),
            Self::Technology => format!("Contemporary office space with modern workstations, large monitors, and collaborative areas. The {name} tech environment features clean lines, natural light, and innovative design elements."),
            Self::Fitness => format!("State-of-the-art fitness center with modern equipment, clean facilities, and motivating atmosphere. The {name} gym features bright lighting, organized workout areas, and professional-grade equipment."),
            Self::RealEstate | Self::General => format!("Professional business environment with modern office furniture, clean design, and welcoming atmosphere. The {name} location features contemporary styling and professional presentation."),
        }
    }

    fn character(&self) -> &'static str {
        match self {
            Self::AutoMechanic => "Experienced auto mechanic in clean work uniform, confident and knowledgeable, with friendly demeanor and professional appearance",
            Self::Restaurant => "Chef or restaurant staff in clean uniform, passionate about food, with warm smile and professional presentation",
            Self::Retail => "Friendly sales associate in professional attire, knowledgeable about products, with approachable personality and helpful attitude",
            Self::Technology => "Tech professional in modern casual attire, innovative and confident, with approachable demeanor and expertise",
            Self::Fitness => "Fitness trainer in athletic wear, energetic and motivating, with professional appearance and encouraging attitude",
            Self::RealEstate | Self::General => "Professional business person in appropriate attire, confident and approachable, with friendly demeanor and expertise",
        }
    }

    fn dialogue(&self, name: &str) -> String {
        match self {
            Self::AutoMechanic => format!("\"At {name}, we provide reliable auto repair services with honest pricing and expert craftsmanship. Your vehicle is in good hands with our certified technicians.\""),
            Self::Restaurant => format!("\"Welcome to {name}, where we serve fresh, locally-sourced ingredients with authentic flavors. Experience the taste of quality in every dish.\""),
            Self::Retail => format!("\"Discover quality products at {name}. We're committed to providing excellent customer service and the best selection for your needs.\""),
            Self::Technology => format!("\"Innovation meets excellence at {name}. We deliver cutting-edge solutions with reliable support and professional expertise.\""),
            Self::Fitness => format!("\"Transform your fitness journey at {name}. Our state-of-the-art facilities and expert trainers are here to help you achieve your goals.\""),
            Self::RealEstate | Self::General => format!("\"Experience the difference at {name}. We're committed to providing exceptional service and building lasting relationships with our customers.\""),
        }
    }

    fn action_sequence(&self, name: &str) -> Vec<ActionStep> {
        let beats: [String; 3] = match self {
            Self::AutoMechanic => [
                format!("Opening shot of {name} exterior with professional signage and clean appearance"),
                "Mechanic working on vehicle with precision and expertise, showcasing professional service".into(),
                "Customer interaction showing trust and satisfaction with the service provided".into(),
            ],
            Self::Restaurant => [
                format!("Wide shot of {name} restaurant exterior with inviting atmosphere"),
                "Chef preparing fresh ingredients with passion and culinary expertise".into(),
                "Customers enjoying their meal with satisfied expressions and warm atmosphere".into(),
            ],
            _ => [
                format!("Establishing shot of {name} business location with professional appearance"),
                "Staff providing excellent customer service with professional expertise".into(),
                "Customer satisfaction and positive interaction showcasing business value".into(),
            ],
        };
        let pacing = [
            ("smooth cut to interior", "3 seconds"),
            ("cross dissolve", "4 seconds"),
            ("fade to black", "3 seconds"),
        ];
        beats
            .into_iter()
            .zip(pacing)
            .enumerate()
            .map(|(i, (description, (transition, duration)))| {
                ActionStep::new(i as u32 + 1, description)
                    .with_transition(transition)
                    .with_duration(duration)
            })
            .collect()
    }
}

/// Style flags picked up from the prompt wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct StyleFlags {
    cinematic: bool,
    neon: bool,
    modern: bool,
    professional: bool,
}

impl StyleFlags {
    fn detect(lower: &str) -> Self {
        Self {
            cinematic: contains_any(lower, &["cinematic", "film"]),
            neon: contains_any(lower, &["neon", "cyber"]),
            modern: contains_any(lower, &["modern", "contemporary"]),
            professional: contains_any(lower, &["professional", "corporate"]),
        }
    }
}

const LOCATIONS: &[&str] = &[
    "nairobi", "mombasa", "kisumu", "nakuru", "eldoret", "thika", "malindi", "kitale",
];

/// Returns the first known location mentioned in the prompt.
pub fn detect_location(prompt: &str) -> Option<&'static str> {
    let lower = prompt.to_lowercase();
    LOCATIONS.iter().copied().find(|loc| lower.contains(loc))
}

/// Returns the word following `named`, stripped of punctuation.
pub fn detect_business_name(prompt: &str) -> Option<String> {
    let words: Vec<&str> = prompt.split(' ').collect();
    words
        .windows(2)
        .find(|pair| pair[0].to_lowercase().contains("named"))
        .map(|pair| pair[1].replace(['.', ',', '!', '?'], ""))
}

/// Expands a one-line business pitch into a fully populated draft.
pub fn magic_prompt(prompt: &str) -> Draft {
    let lower = prompt.to_lowercase();
    let business = BusinessType::detect(&lower);
    let flags = StyleFlags::detect(&lower);
    let name = detect_business_name(prompt).unwrap_or_else(|| "Business".to_string());

    let mut scene = business.scene(&name);
    if let Some(location) = detect_location(&lower) {
        let mut chars = location.chars();
        let city: String = chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        scene.push_str(&format!(" Set in {city}, with local character visible in the surroundings."));
    }
    if flags.cinematic {
        scene.push_str(" Cinematic composition with dramatic angles and professional film lighting.");
    }
    if flags.neon {
        scene.push_str(" Neon accent lighting and cyberpunk-inspired design elements with vibrant colors.");
    }

    let mut character = business.character().to_string();
    if flags.professional {
        character.push_str(" Professional presentation with polished appearance and business-appropriate styling.");
    }

    let mut camera = vec![CAM_MEDIUM, CAM_WIDE];
    if flags.cinematic {
        camera.extend([CAM_CLOSE_UP, CAM_LOW_ANGLE]);
    }
    if flags.neon {
        camera.push(CAM_TILT);
    }

    let mut lighting = vec![LIGHT_DAYLIGHT];
    if flags.cinematic {
        lighting.push(LIGHT_HIGH_CONTRAST);
    }
    if flags.neon {
        lighting.push(LIGHT_NEON);
    }
    if flags.modern {
        lighting.push(LIGHT_STUDIO);
    }

    let mut style = vec![STYLE_COMMERCIAL];
    if flags.cinematic {
        style.push(STYLE_CINEMATIC);
    }
    if flags.neon {
        style.push(STYLE_CYBERPUNK);
    }
    if flags.modern {
        style.push(STYLE_CONTEMPORARY);
    }
    if flags.professional {
        style.push(STYLE_CORPORATE);
    }

    let mut sound_effects = vec![SFX_PROFESSIONAL];
    match business {
        BusinessType::AutoMechanic => sound_effects.push("mechanical sounds, tool usage, engine sounds"),
        BusinessType::Restaurant => sound_effects.push("kitchen sounds, sizzling, ambient dining atmosphere"),
        BusinessType::Fitness => sound_effects.push("equipment sounds, motivational atmosphere"),
        _ => {}
    }
    if flags.cinematic {
        sound_effects.push(SFX_DRAMATIC);
    }

    let mut music = vec![MUSIC_UPBEAT];
    if flags.cinematic {
        music.push("dramatic, tension-building orchestral music");
    }
    if flags.neon {
        music.push("electronic, synthwave-inspired music");
    }
    if business == BusinessType::Restaurant {
        music.push("warm, inviting acoustic music");
    }

    let mut negative = vec![NEG_LOW_QUALITY];
    if flags.cinematic {
        negative.push(NEG_CARTOONISH);
    }
    if flags.neon {
        negative.push("dull colors, low contrast");
    }

    let mut transition_style = vec!["smooth cuts with professional pacing"];
    if flags.cinematic {
        transition_style.push("cinematic transitions with dramatic timing");
    }
    if flags.neon {
        transition_style.push("dynamic transitions with energetic flow");
    }

    let rhythm = if flags.cinematic {
        "dramatic pacing with tension and release"
    } else if flags.neon {
        "fast-paced rhythm with high energy"
    } else {
        "medium-paced rhythm with professional flow"
    };

    Draft {
        initial_prompt: prompt.to_string(),
        scene,
        character,
        camera: Choices::from(&camera[..]),
        lighting: Choices::from(&lighting[..]),
        style: Choices::from(&style[..]),
        dialogue: business.dialogue(&name),
        sound_effects: Choices::from(&sound_effects[..]),
        background_music: Choices::from(&music[..]),
        reference_images: Vec::new(),
        reference_videos: Vec::new(),
        negative_prompt: Choices::from(&negative[..]),
        action_steps: business.action_sequence(&name),
        overall_transition_style: Choices::from(&transition_style[..]),
        transition_rhythm: Choices::from([rhythm]),
    }
}

// =============================================================================
// TEMPLATES
// =============================================================================

/// A named starting point that fills in the common fields.
#[derive(Debug, Clone, Serialize)]
pub struct VideoTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub scene: &'static str,
    pub character: &'static str,
    pub camera: &'static [&'static str],
    pub lighting: &'static [&'static str],
    pub style: &'static [&'static str],
    pub sound_effects: &'static [&'static str],
    pub background_music: &'static [&'static str],
    pub negative_prompt: &'static [&'static str],
}

impl VideoTemplate {
    /// Field values to apply onto a draft.
    pub fn patch(&self) -> DraftPatch {
        DraftPatch {
            scene: Some(self.scene.to_string()),
            character: Some(self.character.to_string()),
            dialogue: None,
            camera: Some(Choices::from(self.camera)),
            lighting: Some(Choices::from(self.lighting)),
            style: Some(Choices::from(self.style)),
            sound_effects: Some(Choices::from(self.sound_effects)),
            background_music: Some(Choices::from(self.background_music)),
            negative_prompt: Some(Choices::from(self.negative_prompt)),
        }
    }
}

pub const TEMPLATES: &[VideoTemplate] = &[
    VideoTemplate {
        id: "commercial",
        name: "Product Commercial",
        description: "Professional product advertisement with clean, modern aesthetic",
        category: "Commercial",
        scene: "Modern, clean commercial setting with professional lighting and minimal distractions",
        character: "Professional model or spokesperson, well-dressed, confident and approachable",
        camera: &[CAM_MEDIUM, CAM_WIDE],
        lighting: &[LIGHT_STUDIO],
        style: &[STYLE_COMMERCIAL],
        sound_effects: &[SFX_PROFESSIONAL],
        background_music: &[MUSIC_UPBEAT],
        negative_prompt: &[NEG_LOW_QUALITY, NEG_CARTOONISH],
    },
    VideoTemplate {
        id: "documentary",
        name: "Documentary Style",
        description: "Authentic, real-world storytelling with natural lighting",
        category: "Documentary",
        scene: "Real-world environment with authentic, lived-in details and natural atmosphere",
        character: "Real person in their natural environment, authentic clothing and expressions",
        camera: &[CAM_HANDHELD, CAM_MEDIUM],
        lighting: &[LIGHT_DAYLIGHT],
        style: &[STYLE_DOCUMENTARY],
        sound_effects: &["natural ambient sounds, environmental audio"],
        background_music: &["ambient, atmospheric soundscape"],
        negative_prompt: &[NEG_ARTIFICIAL, NEG_OVEREXPOSED],
    },
    VideoTemplate {
        id: "cinematic",
        name: "Cinematic Drama",
        description: "Film-like quality with dramatic lighting and composition",
        category: "Cinematic",
        scene: "Cinematic environment with dramatic composition and atmospheric details",
        character: "Dramatic character with expressive features, wearing appropriate costume for the scene",
        camera: &[CAM_CLOSE_UP, CAM_LOW_ANGLE],
        lighting: &[LIGHT_HIGH_CONTRAST],
        style: &[STYLE_CINEMATIC],
        sound_effects: &[SFX_DRAMATIC],
        background_music: &[MUSIC_DRAMATIC],
        negative_prompt: &[NEG_CARTOONISH, NEG_OVEREXPOSED],
    },
    VideoTemplate {
        id: "social",
        name: "Social Media",
        description: "Engaging, short-form content optimized for social platforms",
        category: "Social",
        scene: "Modern, trendy environment with vibrant colors and contemporary design",
        character: "Relatable person with casual, trendy clothing and natural expressions",
        camera: &[CAM_MEDIUM, CAM_CLOSE_UP],
        lighting: &[LIGHT_DAYLIGHT],
        style: &[STYLE_COMMERCIAL],
        sound_effects: &["upbeat ambient sounds, modern environment"],
        background_music: &[MUSIC_UPBEAT],
        negative_prompt: &[NEG_LOW_QUALITY, NEG_HARSH],
    },
    VideoTemplate {
        id: "romantic",
        name: "Romantic Scene",
        description: "Soft, intimate atmosphere with warm lighting",
        category: "Romance",
        scene: "Intimate, romantic setting with soft lighting and cozy atmosphere",
        character: "Romantic couple or individual with soft, warm expressions and elegant clothing",
        camera: &[CAM_CLOSE_UP, CAM_MEDIUM],
        lighting: &[LIGHT_CANDLE, LIGHT_GOLDEN_HOUR],
        style: &[STYLE_ROMANTIC],
        sound_effects: &["soft ambient sounds, intimate environment"],
        background_music: &["romantic, soft and dreamy"],
        negative_prompt: &[NEG_HARSH, NEG_ARTIFICIAL],
    },
    VideoTemplate {
        id: "action",
        name: "Action Sequence",
        description: "Dynamic, high-energy content with movement and excitement",
        category: "Action",
        scene: "Dynamic environment with movement, energy, and exciting visual elements",
        character: "Action-oriented character with dynamic poses and energetic expressions",
        camera: &[CAM_HANDHELD, CAM_TILT],
        lighting: &[LIGHT_HIGH_CONTRAST],
        style: &[STYLE_ACTION],
        sound_effects: &["dynamic ambient sounds, action environment"],
        background_music: &[MUSIC_DRAMATIC],
        negative_prompt: &[NEG_LOW_QUALITY, "motion blur, camera shake"],
    },
];

/// Looks up a template by id.
pub fn template(id: &str) -> Option<&'static VideoTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Templates in a category; `None` or `"All"` returns every template.
pub fn templates_in(category: Option<&str>) -> Vec<&'static VideoTemplate> {
    match category {
        None => TEMPLATES.iter().collect(),
        Some(c) if c.eq_ignore_ascii_case("all") => TEMPLATES.iter().collect(),
        Some(c) => TEMPLATES
            .iter()
            .filter(|t| t.category.eq_ignore_ascii_case(c))
            .collect(),
    }
}

/// Distinct template categories in catalog order.
pub fn template_categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for t in TEMPLATES {
        if !categories.contains(&t.category) {
            categories.push(t.category);
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_blank_prompt() {
        assert!(suggest("   ").is_empty());
    }

    #[test]
    fn test_suggest_commercial() {
        let patch = suggest("A commercial for our car dealership");
        assert_eq!(
            patch.scene.as_deref(),
            Some("Professional commercial setting with clean, modern environment")
        );
        assert_eq!(patch.lighting.unwrap().flatten(), LIGHT_STUDIO);
        assert!(patch.character.unwrap().starts_with("Professional mechanic"));
        assert_eq!(patch.background_music.unwrap().flatten(), MUSIC_UPBEAT);
    }

    #[test]
    fn test_suggest_nature_without_audio() {
        let patch = suggest("Nature walk through the forest");
        assert_eq!(patch.camera.unwrap().flatten(), CAM_WIDE);
        assert!(patch.background_music.is_none());
        assert!(patch.character.is_none());
    }

    #[test]
    fn test_suggest_matches_substrings() {
        // "ad" inside "head" selects the commercial branch.
        let patch = suggest("Rain on his head");
        assert!(patch.style.unwrap().flatten().starts_with("commercial style"));
    }

    #[test]
    fn test_business_detection() {
        assert_eq!(BusinessType::detect("Best CAFE in town"), BusinessType::Restaurant);
        assert_eq!(BusinessType::detect("property listings"), BusinessType::RealEstate);
        assert_eq!(BusinessType::detect("yoga studio"), BusinessType::General);
    }

    #[test]
    fn test_business_name_and_location() {
        assert_eq!(
            detect_business_name("A garage named Speedy, in Nairobi").as_deref(),
            Some("Speedy")
        );
        assert_eq!(detect_business_name("no name here"), None);
        assert_eq!(detect_location("A garage in Mombasa"), Some("mombasa"));
    }

    #[test]
    fn test_magic_prompt_populates_everything() {
        let draft = magic_prompt("Cinematic ad for a restaurant named Mama's.");
        assert!(draft.scene.contains("Mama's dining area"));
        assert!(draft.scene.ends_with("professional film lighting."));
        assert_eq!(draft.camera.len(), 4);
        assert!(draft
            .background_music
            .as_slice()
            .contains(&"warm, inviting acoustic music".to_string()));
        assert_eq!(draft.action_steps.len(), 3);
        assert_eq!(draft.action_steps[2].step, 3);
        assert_eq!(draft.action_steps[1].transition.as_deref(), Some("cross dissolve"));
        assert_eq!(
            draft.transition_rhythm.flatten(),
            "dramatic pacing with tension and release"
        );

        let doc = draft.to_document();
        assert_eq!(doc.action_sequence.len(), 3);
        assert!(doc.transitions.is_some());
    }

    #[test]
    fn test_magic_prompt_mentions_location() {
        let draft = magic_prompt("auto repair shop named Torque in Nakuru, cinematic");
        assert!(
            draft.scene.contains(" Set in Nakuru, with local character"),
            "{}",
            draft.scene
        );
        assert!(draft.scene.ends_with("professional film lighting."));

        let without = magic_prompt("auto repair shop named Torque");
        assert!(!without.scene.contains("Set in"));
    }

    #[test]
    fn test_magic_prompt_default_name() {
        let draft = magic_prompt("neon gym promo");
        assert!(draft.scene.contains("The Business gym"));
        assert_eq!(draft.transition_rhythm.flatten(), "fast-paced rhythm with high energy");
    }

    #[test]
    fn test_templates_catalog() {
        assert_eq!(TEMPLATES.len(), 6);
        assert_eq!(template_categories().len(), 6);
        assert_eq!(templates_in(Some("all")).len(), 6);
        assert_eq!(templates_in(Some("romance"))[0].id, "romantic");

        let patch = template("cinematic").unwrap().patch();
        let mut draft = Draft::new();
        patch.apply_to(&mut draft);
        assert_eq!(draft.lighting.flatten(), LIGHT_HIGH_CONTRAST);
        assert_eq!(draft.negative_prompt.len(), 2);
        assert!(template("missing").is_none());
    }
}
