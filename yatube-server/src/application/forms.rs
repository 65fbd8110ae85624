use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::data::group_repository::GroupRepository;
use crate::domain::error::{DomainError, FormErrors};
use crate::domain::group::{TITLE_MAX_LEN, is_valid_slug};
use crate::domain::post::Post;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    #[serde(default)]
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i64>,
}

impl PostForm {
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post
                .group
                .as_ref()
                .map(|g| g.id.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn group_id(&self) -> Option<i64> {
        self.group.trim().parse().ok()
    }

    pub async fn clean(&self, groups: &dyn GroupRepository) -> Result<CleanedPost, DomainError> {
        let trimmed = PostForm {
            text: self.text.trim().to_string(),
            group: self.group.trim().to_string(),
        };

        let mut errors = match trimmed.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };

        let group_id = if trimmed.group.is_empty() {
            None
        } else {
            match trimmed.group.parse::<i64>() {
                Ok(id) => match groups.find_by_id(id).await? {
                    Some(group) => Some(group.id),
                    None => {
                        errors.add("group", INVALID_CHOICE);
                        None
                    }
                },
                Err(_) => {
                    errors.add("group", INVALID_CHOICE);
                    None
                }
            }
        };

        errors.into_result()?;
        Ok(CleanedPost {
            text: trimmed.text,
            group_id,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 150,
        message = "Enter 1 to 150 characters: letters, digits and @/./+/-/_ only."
    ))]
    pub username: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 8, message = "This password is too short. It must contain at least 8 characters."))]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl SignupForm {
    pub fn check(&self) -> Result<SignupForm, DomainError> {
        let cleaned = SignupForm {
            username: self.username.trim().to_string(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_lowercase),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        };

        let mut errors = match cleaned.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };
        if !errors.has("username") && !is_valid_username(&cleaned.username) {
            errors.add(
                "username",
                "Enter 1 to 150 characters: letters, digits and @/./+/-/_ only.",
            );
        }
        if cleaned.password != cleaned.password_confirmation {
            errors.add("password_confirmation", "The two password fields didn't match.");
        }

        errors.into_result()?;
        Ok(cleaned)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next: Option<String>,
}

impl LoginForm {
    pub fn check(&self) -> Result<(), DomainError> {
        let trimmed = LoginForm {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            next: None,
        };
        trimmed
            .validate()
            .map_err(|e| DomainError::InvalidForm(FormErrors::from(e)))
    }

    pub fn safe_next(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| is_local_path(next))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GroupForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

impl GroupForm {
    pub fn check(&self) -> Result<GroupForm, DomainError> {
        let cleaned = GroupForm {
            title: self.title.trim().to_string(),
            slug: self.slug.trim().to_string(),
            description: self.description.trim().to_string(),
        };
        let mut errors = match cleaned.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };
        if cleaned.title.chars().count() > TITLE_MAX_LEN {
            errors.add("title", "Ensure this value has at most 200 characters.");
        }
        if !is_valid_slug(&cleaned.slug) {
            errors.add(
                "slug",
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            );
        }
        errors.into_result()?;
        Ok(cleaned)
    }
}

pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= 150
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
}

pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
