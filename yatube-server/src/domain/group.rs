use std::fmt;

use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

impl From<&Group> for GroupRef {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            title: group.title.clone(),
            slug: group.slug.clone(),
        }
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_url_safe_ascii() {
        assert!(is_valid_slug("test-slug"));
        assert!(is_valid_slug("group_2"));
    }

    #[test]
    fn slug_rejects_spaces_and_non_ascii() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("test slug"));
        assert!(!is_valid_slug("группа"));
        assert!(!is_valid_slug("a/b"));
    }

    #[test]
    fn group_displays_as_title() {
        let group = Group {
            id: 1,
            title: "Тестовая группа".into(),
            slug: "test-slug".into(),
            description: String::new(),
        };
        assert_eq!(group.to_string(), "Тестовая группа");
        assert_eq!(GroupRef::from(&group).to_string(), "Тестовая группа");
    }
}
