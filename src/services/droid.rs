use thirtyfour::{
    error::WebDriverError, By, ChromiumLikeCapabilities, DesiredCapabilities, Key, WebDriver,
    WebElement,
};

use crate::configuration::BrowserSettings;

pub const PLATFORM_URL: &str = "https://www.youtube.com";

const SEARCH_BOX_NAME: &str = "search_query";
const RESULT_TILE_SELECTOR: &str = "ytd-video-renderer";
const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.documentElement.scrollHeight);";

pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &BrowserSettings) -> Result<Self, WebDriverError> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }

        let driver = WebDriver::new(&settings.webdriver_url, caps).await?;
        driver.maximize_window().await?;

        Ok(Droid { driver })
    }

    pub async fn open_video_search(&self, query: &str) -> Result<(), WebDriverError> {
        self.driver.goto(PLATFORM_URL).await?;

        let search_box = self.driver.find(By::Name(SEARCH_BOX_NAME)).await?;
        search_box.send_keys(query).await?;
        search_box.send_keys(Key::Enter + "").await?;

        Ok(())
    }

    pub async fn result_tiles(&self) -> Result<Vec<WebElement>, WebDriverError> {
        self.driver.find_all(By::Css(RESULT_TILE_SELECTOR)).await
    }

    pub async fn scroll_to_bottom(&self) -> Result<(), WebDriverError> {
        self.driver.execute(SCROLL_TO_BOTTOM_JS, vec![]).await?;
        Ok(())
    }

    pub async fn quit(self) -> Result<(), WebDriverError> {
        self.driver.quit().await
    }
}
