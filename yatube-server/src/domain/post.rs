use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::group::GroupRef;
use crate::domain::user::Author;

pub const DISPLAY_LEN: usize = 15;
pub const TITLE_LEN: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author: Author,
    pub text: String,
    pub group: Option<GroupRef>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn title(&self) -> String {
        truncate_chars(&self.text, TITLE_LEN)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&truncate_chars(&self.text, DISPLAY_LEN))
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i64),
    Author(Uuid),
}

impl PostFilter {
    pub fn group_id(&self) -> Option<i64> {
        match self {
            PostFilter::Group(id) => Some(*id),
            _ => None,
        }
    }

    pub fn author_id(&self) -> Option<Uuid> {
        match self {
            PostFilter::Author(id) => Some(*id),
            _ => None,
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Group(id) => post.group.as_ref().map(|g| g.id) == Some(*id),
            PostFilter::Author(id) => post.author.id == *id,
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            id: 1,
            author: Author {
                id: Uuid::new_v4(),
                username: "StasBasov".into(),
            },
            text: text.into(),
            group: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn display_truncates_by_characters() {
        let post = post("Тестовый текст, который длиннее пятнадцати символов");
        assert_eq!(post.to_string(), "Тестовый текст,");
        assert_eq!(post.to_string().chars().count(), DISPLAY_LEN);
    }

    #[test]
    fn short_text_is_shown_whole() {
        assert_eq!(post("short").to_string(), "short");
        assert_eq!(post("short").title(), "short");
    }

    #[test]
    fn filter_matches_group_and_author() {
        let mut p = post("text");
        p.group = Some(GroupRef {
            id: 7,
            title: "g".into(),
            slug: "g".into(),
        });

        assert!(PostFilter::All.matches(&p));
        assert!(PostFilter::Group(7).matches(&p));
        assert!(!PostFilter::Group(8).matches(&p));
        assert!(PostFilter::Author(p.author.id).matches(&p));
        assert!(!PostFilter::Author(Uuid::new_v4()).matches(&p));
    }
}
