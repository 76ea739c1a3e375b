use std::time::Duration;

use anyhow::Context;

use crate::{
    configuration::Settings,
    domain::Video,
    export,
    services::{collect_matching_videos, Canvas, Droid, KeywordFilter, ShapeMask, WordCloud},
};

#[derive(Debug, PartialEq)]
pub struct RunSummary {
    pub matched: usize,
    pub csv_written: bool,
    pub wordcloud_written: bool,
}

pub async fn run(settings: Settings) -> anyhow::Result<RunSummary> {
    /*
    1. Compile the keyword patterns
    2. Drive the browser: search, scroll, collect matching tiles
    3. Write the CSV report
    4. Render the shaped word cloud from the matched titles
    */
    let filter = KeywordFilter::compile(&settings.search.patterns)
        .context("invalid search pattern in configuration")?;

    let droid = Droid::new(&settings.browser).await?;
    droid.open_video_search(&settings.search.query).await?;
    tokio::time::sleep(Duration::from_secs(settings.browser.search_load_wait_secs)).await;

    let outcome =
        collect_matching_videos(&droid, &settings.search, &settings.browser, &filter).await;
    droid.quit().await?;

    let videos = outcome?.into_videos();
    log::info!(
        "Collected {} matching videos for '{}'",
        videos.len(),
        settings.search.query
    );

    let csv_written = export::write_videos(&settings.output.csv_path, &videos)?;

    let wordcloud_written = match videos.is_empty() {
        true => {
            log::warn!("No matching videos, skipping the word cloud");
            false
        }
        false => render_wordcloud(&settings, &videos)?,
    };

    Ok(RunSummary {
        matched: videos.len(),
        csv_written,
        wordcloud_written,
    })
}

fn render_wordcloud(settings: &Settings, videos: &[Video]) -> anyhow::Result<bool> {
    let canvas = match &settings.output.shape_image_path {
        Some(path) => match ShapeMask::from_path(path) {
            Ok(mask) => Canvas::Shape(mask),
            Err(e) => {
                log::error!("Shape image unusable, skipping the word cloud: {:?}", e);
                return Ok(false);
            }
        },
        None => Canvas::Dimensions {
            width: settings.wordcloud.width,
            height: settings.wordcloud.height,
        },
    };

    let titles = videos
        .iter()
        .map(|video| video.title.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let cloud = WordCloud::new(&settings.wordcloud)?;
    let image = cloud.render(&titles, canvas)?;
    image
        .save(&settings.output.wordcloud_path)
        .with_context(|| format!("failed to save {}", settings.output.wordcloud_path.display()))?;

    log::info!(
        "Word cloud saved to {}",
        settings.output.wordcloud_path.display()
    );
    Ok(true)
}
