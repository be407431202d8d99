// src/models/selectors.rs

//! CSS selectors and link markers for scraping the developer tracker.

/// Selectors used to pull posts out of the tracker listing.
#[derive(Debug, Clone)]
pub struct TrackerSelectors {
    /// Selector for each post card in the listing
    pub card_selector: String,

    /// Selector for candidate links within a card
    pub link_selector: String,

    /// Selector for the status block holding date and author
    pub status_selector: String,

    /// Substring of an href that marks the canonical post link
    pub post_link_marker: String,

    /// Substring of an href that marks the forum link
    pub forum_link_marker: String,

    /// Separator between the posted-at text and the author name
    pub author_separator: String,
}

impl Default for TrackerSelectors {
    fn default() -> Self {
        Self {
            card_selector: ".trackerbit".to_string(),
            link_selector: "a[href]".to_string(),
            status_selector: ".threadstatus".to_string(),
            post_link_marker: "postid".to_string(),
            forum_link_marker: "forumdisplay".to_string(),
            author_separator: " by ".to_string(),
        }
    }
}
