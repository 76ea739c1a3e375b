use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub search: SearchSettings,
    pub browser: BrowserSettings,
    pub output: OutputSettings,
    pub wordcloud: WordCloudSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub query: String,
    pub patterns: Vec<String>,
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    #[serde(default)]
    pub headless: bool,
    pub search_load_wait_secs: u64,
    pub scroll_pause_secs: u64,
    pub max_scrolls: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub csv_path: PathBuf,
    pub wordcloud_path: PathBuf,
    pub shape_image_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordCloudSettings {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub background_color: String,
    pub contour_width: u32,
    pub contour_color: String,
    pub font_path: PathBuf,
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f32,
    pub max_font_size: Option<f32>,
    #[serde(default = "default_font_step")]
    pub font_step: f32,
    #[serde(default = "default_word_margin")]
    pub word_margin: u32,
    #[serde(default = "default_prefer_horizontal")]
    pub prefer_horizontal: f64,
    #[serde(default = "default_relative_scaling")]
    pub relative_scaling: f32,
    pub rng_seed: Option<u64>,
}

fn default_min_font_size() -> f32 {
    4.0
}

fn default_font_step() -> f32 {
    1.0
}

fn default_word_margin() -> u32 {
    2
}

fn default_prefer_horizontal() -> f64 {
    0.9
}

fn default_relative_scaling() -> f32 {
    0.5
}

pub fn get_configuration(path: &Path) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
