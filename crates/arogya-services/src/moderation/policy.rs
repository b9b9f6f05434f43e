/// Fixed moderation policy handed to the classifier as its system prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationPolicy {
    pub name: String,
    pub prompt: String,
    /// Used when the classifier rejects without giving a reason
    pub default_rejection_reason: String,
}

impl ModerationPolicy {
    pub fn new(
        name: impl Into<String>,
        prompt: impl Into<String>,
        default_rejection_reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            default_rejection_reason: default_rejection_reason.into(),
        }
    }

    /// Policy for the indigenous dairy and Ayurveda community feed
    pub fn indigenous_dairy() -> Self {
        Self::new(
            "indigenous_dairy",
            INDIGENOUS_DAIRY_PROMPT,
            "Image does not match the community content guidelines for indigenous dairy and Ayurveda",
        )
    }
}

const INDIGENOUS_DAIRY_PROMPT: &str = "\
You review images posted to a community about indigenous Indian cattle, A2 dairy and Ayurveda.

ACCEPT an image when it clearly shows any of:
- recognizable indigenous Indian cattle breeds such as Gir, Sahiwal, Red Sindhi, Tharparkar, Rathi, Kankrej, Ongole, Hallikar or Kangayam
- A2 milk, curd, buttermilk, ghee or other dairy products from indigenous cattle
- traditional cattle care, gaushala life or pasture grazing of indigenous cattle
- Ayurvedic herbs, preparations or practices
- educational material about any of the above

REJECT an image when it shows any of:
- exotic or crossbred dairy cattle such as Holstein Friesian or Jersey
- other livestock such as buffalo, goats, sheep, pigs or poultry as the main subject
- advertising or commercial promotion without educational value
- content unrelated to indigenous cattle, dairy or Ayurveda

Reply with a single JSON object and nothing else:
{\"valid\": true} when the image is acceptable, or
{\"valid\": false, \"reason\": \"<one short sentence for the user>\"} when it is not.";
