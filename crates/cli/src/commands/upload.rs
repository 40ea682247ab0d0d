use std::path::PathBuf;

use anyhow::{Context, Result};
use storyfeed_api::NewStory;
use storyfeed_service::{SessionService, StoryService};

pub async fn run(
    sessions: &SessionService,
    stories: &StoryService,
    photo: PathBuf,
    description: String,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<()> {
    let session = sessions.require_session().await?;

    let bytes = std::fs::read(&photo)
        .with_context(|| format!("could not read photo {}", photo.display()))?;
    let file_name = photo
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo.jpg")
        .to_owned();

    stories
        .upload(&session.token, NewStory { description, photo: bytes, file_name, lat, lon })
        .await?;

    println!("story uploaded; it will appear after the next refresh");
    Ok(())
}
