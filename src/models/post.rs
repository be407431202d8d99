//! Tracker card and post data structures.

use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::utils::date::{local_timestamp, parse_posted_at};

/// Raw fields scraped from one tracker card.
///
/// Any field may be missing; a card only becomes a [`Post`] once all of
/// them are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerCard {
    /// Text of the canonical post link
    pub title: Option<String>,

    /// Relative href of the canonical post link
    pub url: Option<String>,

    /// Text of the forum link
    pub forum: Option<String>,

    /// Poster name, taken from the status block
    pub author: Option<String>,

    /// Whole status block text, e.g. `11-21-2018 09:20 AM by SSG_RedPanda`
    pub status: Option<String>,

    /// Outer HTML of the card, kept for error reports
    pub html: String,
}

/// A developer post ready to be published.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub title: String,
    /// Relative to the forum root
    pub url: String,
    pub forum: String,
    pub author: String,
    /// Unix timestamp of the post
    pub timestamp: f64,
}

impl TrackerCard {
    /// Validate the card and resolve its timestamp.
    ///
    /// `today` anchors relative dates such as `Today 09:20 AM`.
    pub fn into_post(self, today: NaiveDate) -> Result<Post> {
        let TrackerCard {
            title,
            url,
            forum,
            author,
            status,
            html,
        } = self;

        let (Some(title), Some(url), Some(forum), Some(author)) =
            (title.clone(), url.clone(), forum.clone(), author.clone())
        else {
            return Err(AppError::markup(
                format!(
                    "Info missing!\nTitle: {}\nURL: {}\nForum: {}\nBy: {}\nStatus: {}",
                    show(&title),
                    show(&url),
                    show(&forum),
                    show(&author),
                    show(&status),
                ),
                html,
            ));
        };

        let status = status.unwrap_or_default();
        let timestamp = parse_posted_at(&status, today)
            .and_then(local_timestamp)
            .ok_or_else(|| {
                AppError::markup(format!("Cannot parse post date from '{status}'"), html)
            })?;

        Ok(Post {
            title,
            url,
            forum,
            author,
            timestamp,
        })
    }
}

fn show(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("<missing>")
}
