//! Portrait generation for the AI persona.

use serde::Serialize;
use tracing::Instrument;

use af_domain::error::Result;
use af_domain::profile::ProfileField;
use af_domain::trace::TraceEvent;
use af_providers::ImageRequest;

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Portrait {
    pub url: String,
    pub prompt: String,
}

/// Generate an image from `prompt`, store it at the identifier's image
/// key and record the prompt and public URL in the profile.
pub async fn generate_portrait(state: &AppState, id: &str, prompt: &str) -> Result<Portrait> {
    let span = tracing::info_span!("generate_portrait", id = %id);
    async {
        let cfg = &state.config.image;
        let image = state
            .images
            .generate(ImageRequest {
                prompt: prompt.to_owned(),
                seed: cfg.seed,
                cfg_scale: cfg.cfg_scale,
                steps: cfg.steps,
                style_preset: cfg.style_preset.clone(),
            })
            .await?;

        let bytes = image.png.len();
        state.store.put(&state.keys.image_key(id), image.png).await?;
        TraceEvent::ImageGenerated {
            id: id.to_owned(),
            model: image.model,
            bytes,
        }
        .emit();

        let url = format!(
            "{}/{}",
            cfg.public_url_prefix.trim_end_matches('/'),
            state.keys.image_object(id)
        );

        state
            .profiles
            .update(id, |profile| {
                profile.set(ProfileField::AiPrompt, prompt);
                profile.set(ProfileField::AiImage, url.as_str());
                vec![
                    ProfileField::AiPrompt.key().to_owned(),
                    ProfileField::AiImage.key().to_owned(),
                ]
            })
            .await?;

        Ok(Portrait {
            url,
            prompt: prompt.to_owned(),
        })
    }
    .instrument(span)
    .await
}
