// src/services/message.rs

//! Status message formatting.

use crate::error::{AppError, Result};
use crate::models::{Config, Post};

/// Number of characters dropped from the title per shortening step.
pub const SHORTEN_STEP: usize = 3;

/// Drop the last [`SHORTEN_STEP`] characters of `title`.
///
/// Returns `None` once nothing would be left.
pub fn shorten(title: &str) -> Option<String> {
    let keep = title.chars().count().saturating_sub(SHORTEN_STEP);
    if keep == 0 {
        return None;
    }
    Some(title.chars().take(keep).collect())
}

/// Replace `@` so the title cannot mention an account.
pub fn neutralize_mentions(title: &str) -> String {
    title.replace('@', "[at]")
}

/// Format a post with the message template.
pub fn format_message(hashtag: &str, post: &Post, title: &str, full_url: &str) -> String {
    format!(
        "#{} dev post by {} in {} > \"{}\" @ {}",
        hashtag, post.author, post.forum, title, full_url
    )
}

/// Build the status message for a post, shortening the title until the
/// message is under `config.max_len` characters.
pub fn build_message(post: &Post, config: &Config) -> Result<String> {
    let full_url = config.post_url(&post.url);
    let mut title = neutralize_mentions(&post.title);

    loop {
        let message = format_message(&config.hashtag, post, &title, &full_url);
        if message.chars().count() < config.max_len {
            return Ok(message);
        }
        title = shorten(&title).ok_or_else(|| {
            AppError::message(format!(
                "Message too long even without a title\nforum: {}\nurl: {}\nby: {}",
                post.forum, full_url, post.author
            ))
        })?;
    }
}
