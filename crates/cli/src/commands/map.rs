use anyhow::Result;
use storyfeed_service::{SessionService, StoryService};

/// Print every geotagged story as a map-marker line.
pub async fn run(sessions: &SessionService, stories: &StoryService) -> Result<()> {
    let session = sessions.require_session().await?;
    let located = stories.locations(&session.token).await?;

    let mut markers = 0usize;
    for story in &located {
        if let (Some(lat), Some(lon)) = (story.lat, story.lon) {
            println!("{:.5},{:.5}  {}  {}", lat, lon, story.name, story.description);
            markers += 1;
        }
    }
    println!("{} markers", markers);
    Ok(())
}
