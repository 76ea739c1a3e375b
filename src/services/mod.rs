pub mod droid;
pub mod keyword_filter;
pub mod video_scraper;
pub mod wordcloud;

pub use droid::*;
pub use keyword_filter::*;
pub use video_scraper::*;
pub use wordcloud::*;
