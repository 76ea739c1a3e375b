use std::{collections::HashSet, time::Duration};

use thirtyfour::{error::WebDriverError, By, WebElement};
use url::Url;

use crate::{
    configuration::{BrowserSettings, SearchSettings},
    domain::Video,
};

use super::{droid::PLATFORM_URL, Droid, KeywordFilter};

const VIDEO_TITLE_ID: &str = "video-title";
const METADATA_LINE_SELECTOR: &str = "#metadata-line";
const DESCRIPTION_ID: &str = "description-text";

#[derive(Debug)]
pub enum ScrapeOutcome {
    Filled(Vec<Video>),
    ScrollLimitReached(Vec<Video>),
}

impl ScrapeOutcome {
    pub fn into_videos(self) -> Vec<Video> {
        match self {
            ScrapeOutcome::Filled(videos) => videos,
            ScrapeOutcome::ScrollLimitReached(videos) => videos,
        }
    }
}

pub async fn collect_matching_videos(
    droid: &Droid,
    search: &SearchSettings,
    browser: &BrowserSettings,
    filter: &KeywordFilter,
) -> Result<ScrapeOutcome, WebDriverError> {
    let mut videos: Vec<Video> = vec![];
    let mut seen_links: HashSet<String> = HashSet::new();
    let mut examined = 0;
    let mut scroll_count = 0;

    while videos.len() < search.max_results {
        let tiles = droid.result_tiles().await?;

        for tile in tiles.iter().skip(examined) {
            match read_tile(tile).await {
                Ok(Some(raw)) => {
                    if seen_links.contains(&raw.link) {
                        continue;
                    }
                    seen_links.insert(raw.link.clone());

                    if filter.matches(&raw.title) || filter.matches(&raw.description) {
                        videos.push(Video {
                            title: raw.title,
                            link: raw.link,
                            views: raw.views,
                            publish_time: raw.publish_time,
                        });
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("Failed to read result tile: {:?}", e);
                    continue;
                }
            }

            if videos.len() >= search.max_results {
                break;
            }
        }
        examined = tiles.len();

        if videos.len() >= search.max_results {
            break;
        }

        droid.scroll_to_bottom().await?;
        tokio::time::sleep(Duration::from_secs(browser.scroll_pause_secs)).await;

        scroll_count += 1;
        if scroll_count > browser.max_scrolls {
            log::warn!(
                "Reached scroll limit ({}) with {} matching videos, stopping",
                browser.max_scrolls,
                videos.len()
            );
            videos.truncate(search.max_results);
            return Ok(ScrapeOutcome::ScrollLimitReached(videos));
        }
    }

    videos.truncate(search.max_results);
    Ok(ScrapeOutcome::Filled(videos))
}

struct RawTile {
    title: String,
    link: String,
    views: String,
    publish_time: String,
    description: String,
}

async fn read_tile(tile: &WebElement) -> Result<Option<RawTile>, WebDriverError> {
    let title_element = tile.find(By::Id(VIDEO_TITLE_ID)).await?;
    let title = title_element.text().await?;

    let href = title_element.attr("href").await?;
    let link = match href.as_deref().and_then(resolve_link) {
        Some(link) => link,
        None => {
            log::debug!("Result tile without a usable link, skipped: {:?}", href);
            return Ok(None);
        }
    };

    let metadata_line = tile
        .find(By::Css(METADATA_LINE_SELECTOR))
        .await?
        .text()
        .await?;
    let (views, publish_time) = parse_metadata_line(&metadata_line);

    let description = match tile.find(By::Id(DESCRIPTION_ID)).await {
        Ok(element) => element.text().await?,
        Err(_) => String::new(),
    };

    Ok(Some(RawTile {
        title,
        link,
        views,
        publish_time,
        description,
    }))
}

// Drivers disagree on whether the href attribute comes back resolved, so
// relative links are joined against the platform origin here.
fn resolve_link(href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(PLATFORM_URL)
            .ok()?
            .join(href)
            .ok()
            .map(|url| url.to_string()),
        Err(_) => None,
    }
}

fn parse_metadata_line(text: &str) -> (String, String) {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let views = lines.next().unwrap_or("N/A").to_string();
    let publish_time = lines.next().unwrap_or("N/A").to_string();

    (views, publish_time)
}

#[cfg(test)]
mod tests {
    use super::{parse_metadata_line, resolve_link};

    #[test]
    fn parse_metadata_line_full() {
        let text = "1.2M views\n3 years ago";
        let (views, publish_time) = parse_metadata_line(text);

        assert_eq!(views, "1.2M views");
        assert_eq!(publish_time, "3 years ago");
    }

    #[test]
    fn parse_metadata_line_views_only() {
        let (views, publish_time) = parse_metadata_line("87 views");

        assert_eq!(views, "87 views");
        assert_eq!(publish_time, "N/A");
    }

    #[test]
    fn parse_metadata_line_empty() {
        let (views, publish_time) = parse_metadata_line("");

        assert_eq!(views, "N/A");
        assert_eq!(publish_time, "N/A");
    }

    #[test]
    fn resolve_link_absolute() {
        let link = resolve_link("https://www.youtube.com/watch?v=abc123").unwrap();

        assert_eq!(link, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn resolve_link_relative() {
        let link = resolve_link("/watch?v=abc123").unwrap();

        assert_eq!(link, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn resolve_link_garbage() {
        assert_eq!(resolve_link("http://"), None);
    }
}
