// ─── News Feeds ───
// The main screen shows two RSS feeds: launcher news and dev-forum posts.
// They load independently of the manifest pipeline and fail independently.

use chrono::{DateTime, FixedOffset};
use quick_xml::de::from_str;
use reqwest::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::ui::{NewsPanel, UiSink};

const MAX_ITEMS_PER_FEED: usize = 8;
const MAX_SUMMARY_CHARS: usize = 280;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub link: Option<String>,
    pub summary: String,
    pub published: Option<DateTime<FixedOffset>>,
}

/// What a news panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum NewsContent {
    Loading,
    Disabled,
    Ready(Vec<NewsItem>),
    Failed(String),
}

impl NewsContent {
    /// One-line text for placeholder states.
    pub fn summary_line(&self) -> String {
        match self {
            NewsContent::Loading => "Loading...".into(),
            NewsContent::Disabled => "Web content is disabled.".into(),
            NewsContent::Ready(items) => format!("{} items", items.len()),
            NewsContent::Failed(error) => error.clone(),
        }
    }
}

// ── RSS document model ──────────────────────────────────

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(default, rename = "item")]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub_date: Option<String>,
}

/// Parse an RSS 2.0 document into at most `MAX_ITEMS_PER_FEED` items.
pub fn parse_feed(xml: &str) -> LauncherResult<Vec<NewsItem>> {
    let doc: RssDocument = from_str(xml)?;

    Ok(doc
        .channel
        .items
        .into_iter()
        .take(MAX_ITEMS_PER_FEED)
        .map(|item| NewsItem {
            title: item.title.trim().to_string(),
            link: item.link.map(|l| l.trim().to_string()),
            summary: item
                .description
                .as_deref()
                .map(plain_summary)
                .unwrap_or_default(),
            published: item
                .pub_date
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok()),
        })
        .collect())
}

/// Strip markup from an item description and cap its length.
fn plain_summary(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_SUMMARY_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(MAX_SUMMARY_CHARS).collect();
    cut.push('…');
    cut
}

pub async fn fetch_feed(client: &Client, url: &str) -> LauncherResult<Vec<NewsItem>> {
    debug!("Fetching news feed {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LauncherError::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    parse_feed(&body)
}

/// Fetch both feeds concurrently. Each result stands alone.
pub async fn retrieve_news(
    client: &Client,
    news_url: &str,
    devforum_url: &str,
) -> (NewsContent, NewsContent) {
    let (news, devposts) = tokio::join!(
        fetch_feed(client, news_url),
        fetch_feed(client, devforum_url)
    );
    (into_content(news_url, news), into_content(devforum_url, devposts))
}

fn into_content(url: &str, result: LauncherResult<Vec<NewsItem>>) -> NewsContent {
    match result {
        Ok(items) => NewsContent::Ready(items),
        Err(e) => {
            warn!("Failed to load feed {}: {}", url, e);
            NewsContent::Failed(format!("Failed to load news: {e}"))
        }
    }
}

/// Show placeholders, then the loaded feeds, unless web content is disabled.
pub async fn load_news(
    ui: &dyn UiSink,
    client: &Client,
    fetch_from_web: bool,
    news_url: &str,
    devforum_url: &str,
) {
    if !fetch_from_web {
        ui.show_news(NewsPanel::News, &NewsContent::Disabled);
        ui.show_news(NewsPanel::DevForum, &NewsContent::Disabled);
        return;
    }

    ui.show_news(NewsPanel::News, &NewsContent::Loading);
    ui.show_news(NewsPanel::DevForum, &NewsContent::Loading);

    let (news, devposts) = retrieve_news(client, news_url, devforum_url).await;
    ui.show_news(NewsPanel::News, &news);
    ui.show_news(NewsPanel::DevForum, &devposts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ui::testing::{RecordingUi, UiEvent};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Launcher news</title>
    <link>https://example.org</link>
    <item>
      <title> Release 0.6.3 </title>
      <link>https://example.org/news/063</link>
      <description><![CDATA[<p>Bug fixes and <b>new</b> content.</p>]]></description>
      <pubDate>Tue, 14 May 2024 10:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Devblog</title>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_rss_items() {
        let items = parse_feed(FEED).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Release 0.6.3");
        assert_eq!(items[0].link.as_deref(), Some("https://example.org/news/063"));
        assert_eq!(items[0].summary, "Bug fixes and new content.");
        assert!(items[0].published.is_some());

        assert_eq!(items[1].summary, "");
        assert!(items[1].published.is_none());
    }

    #[test]
    fn invalid_xml_is_an_error() {
        assert!(parse_feed("<rss><channel>").is_err());
    }

    #[test]
    fn entities_are_decoded_and_bare_angles_kept() {
        let feed = FEED.replace(
            "<p>Bug fixes and <b>new</b> content.</p>",
            "<p>Fish &amp; chips &lt;3 a < b</p>",
        );
        let items = parse_feed(&feed).unwrap();
        assert_eq!(items[0].summary, "Fish & chips <3 a < b");
    }

    #[test]
    fn long_summaries_are_cut() {
        let long = "word ".repeat(200);
        let summary = plain_summary(&long);
        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS + 1);
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn placeholder_texts() {
        assert_eq!(NewsContent::Loading.summary_line(), "Loading...");
        assert_eq!(NewsContent::Disabled.summary_line(), "Web content is disabled.");
    }

    #[tokio::test]
    async fn disabled_web_content_makes_no_requests() {
        let ui = RecordingUi::new();
        let client = Client::new();
        // Unroutable URLs: any request would fail loudly
        load_news(&ui, &client, false, "http://0.0.0.0:1/a", "http://0.0.0.0:1/b").await;

        assert_eq!(
            ui.events(),
            vec![
                UiEvent::News(NewsPanel::News, "Web content is disabled.".into()),
                UiEvent::News(NewsPanel::DevForum, "Web content is disabled.".into()),
            ]
        );
    }

    #[tokio::test]
    async fn unreachable_feeds_fail_independently() {
        let ui = RecordingUi::new();
        let client = Client::new();
        load_news(&ui, &client, true, "http://127.0.0.1:1/news", "http://127.0.0.1:1/dev").await;

        let events = ui.events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], UiEvent::News(NewsPanel::News, "Loading...".into()));
        assert!(matches!(&events[2], UiEvent::News(NewsPanel::News, text) if text.starts_with("Failed to load news")));
        assert!(matches!(&events[3], UiEvent::News(NewsPanel::DevForum, text) if text.starts_with("Failed to load news")));
    }
}
