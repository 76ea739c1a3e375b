use std::{fs::File, io::Write, path::Path};

use anyhow::Context;
use serde::Serialize;

use crate::domain::Video;

// Excel refuses to decode a plain UTF-8 CSV as UTF-8 without the BOM,
// which garbles CJK titles.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

#[derive(Serialize)]
struct VideoRow<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Link")]
    link: &'a str,
    #[serde(rename = "Views")]
    views: &'a str,
    #[serde(rename = "Publish Time")]
    publish_time: &'a str,
}

pub fn write_videos(path: &Path, videos: &[Video]) -> anyhow::Result<bool> {
    if videos.is_empty() {
        log::warn!("No videos to write, skipping {}", path.display());
        return Ok(false);
    }

    let mut file = File::create(path)
        .with_context(|| format!("failed to create csv file {}", path.display()))?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new().from_writer(file);
    for video in videos {
        writer.serialize(VideoRow {
            title: &video.title,
            link: &video.link,
            views: &video.views,
            publish_time: &video.publish_time,
        })?;
    }
    writer.flush()?;

    log::info!("Wrote {} videos to {}", videos.len(), path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::domain::Video;

    use super::write_videos;

    fn sample_videos() -> Vec<Video> {
        vec![
            Video {
                title: "WEEX 交易所 tutorial".to_string(),
                link: "https://www.youtube.com/watch?v=a1".to_string(),
                views: "1.2M views".to_string(),
                publish_time: "3 years ago".to_string(),
            },
            Video {
                title: "weex exchange review".to_string(),
                link: "https://www.youtube.com/watch?v=b2".to_string(),
                views: "87 views".to_string(),
                publish_time: "N/A".to_string(),
            },
        ]
    }

    #[test]
    fn writes_bom_headers_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.csv");

        let written = write_videos(&path, &sample_videos()).unwrap();
        assert!(written);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], b"\xef\xbb\xbf");

        let content = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Title,Link,Views,Publish Time"));
        assert_eq!(
            lines.next(),
            Some("WEEX 交易所 tutorial,https://www.youtube.com/watch?v=a1,1.2M views,3 years ago")
        );
        assert_eq!(
            lines.next(),
            Some("weex exchange review,https://www.youtube.com/watch?v=b2,87 views,N/A")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.csv");

        let written = write_videos(&path, &[]).unwrap();

        assert!(!written);
        assert!(!path.exists());
    }
}
