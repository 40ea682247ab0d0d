use anyhow::Result;
use storyfeed_core::{LoadType, StoryItem};
use storyfeed_paging::{MediatorResult, PagingConfig};
use storyfeed_service::{SessionService, StoryService};

/// Walk the paged story view: print the current window, advance the anchor
/// to its edge, and let the pager decide when to append the next page.
pub async fn run(
    sessions: &SessionService,
    stories: &StoryService,
    pages: u32,
    page_size: u32,
) -> Result<()> {
    let session = sessions.require_session().await?;
    let config = PagingConfig { page_size, ..Default::default() };
    let pager = stories.pager(&session.token, config)?;

    if let MediatorResult::Error(e) = pager.attach().await {
        anyhow::bail!("initial refresh failed: {e}");
    }

    let mut printed = 0usize;
    for _ in 0..pages {
        let window = pager.snapshot();
        if printed >= window.len() {
            break;
        }
        for story in &window[printed..] {
            print_story(story);
        }
        printed = window.len();

        if pager.load_state(LoadType::Append).end_of_pagination() {
            println!("(end of stories)");
            break;
        }
        if let Some(MediatorResult::Error(e)) =
            pager.set_anchor(printed.saturating_sub(1)).await
        {
            // Cached stories stay visible; the user can re-run to retry.
            tracing::warn!(error = %e, "could not load more stories");
            println!("(could not load more stories: {e})");
            break;
        }
    }

    println!("{} stories shown", printed);
    Ok(())
}

fn print_story(story: &StoryItem) {
    println!(
        "{}  {}  {}",
        story.created_at.format("%Y-%m-%d %H:%M"),
        story.name,
        story.id
    );
    println!("    {}", story.description);
    if let (Some(lat), Some(lon)) = (story.lat, story.lon) {
        println!("    @ {:.5}, {:.5}", lat, lon);
    }
    println!("    {}", story.photo_url);
}
