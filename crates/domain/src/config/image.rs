use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Portrait generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "d_model_id")]
    pub model_id: String,
    /// Image generation always runs in this single region.
    #[serde(default = "d_region")]
    pub region: String,
    #[serde(default = "d_cfg_scale")]
    pub cfg_scale: f32,
    #[serde(default = "d_steps")]
    pub steps: u32,
    /// `0` asks the model for a random seed.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub style_preset: Option<String>,
    /// URL prefix the web client uses to fetch images
    /// (`<prefix>/<id>_image.png`).
    #[serde(default = "d_public_url_prefix")]
    pub public_url_prefix: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            model_id: d_model_id(),
            region: d_region(),
            cfg_scale: d_cfg_scale(),
            steps: d_steps(),
            seed: 0,
            style_preset: None,
            public_url_prefix: d_public_url_prefix(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_model_id() -> String {
    "stability.stable-diffusion-xl-v1".into()
}
fn d_region() -> String {
    "us-east-1".into()
}
fn d_cfg_scale() -> f32 {
    8.0
}
fn d_steps() -> u32 {
    50
}
fn d_public_url_prefix() -> String {
    "/default/data".into()
}
