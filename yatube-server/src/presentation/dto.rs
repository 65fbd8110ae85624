use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::forms::{LoginForm, PostForm, SignupForm};
use crate::domain::error::FormErrors;
use crate::domain::group::{Group, GroupRef};
use crate::domain::page::Page;
use crate::domain::post::Post;
use crate::domain::user::{Author, User};

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub display: String,
    pub author: Author,
    pub group: Option<GroupRef>,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        let display = post.to_string();
        Self {
            id: post.id,
            text: post.text,
            display,
            author: post.author,
            group: post.group,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageView<T> {
    pub object_list: Vec<T>,
    pub number: u32,
    pub num_pages: u32,
    pub count: u64,
    pub per_page: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u32>,
    pub previous_page_number: Option<u32>,
}

impl From<Page<Post>> for PageView<PostView> {
    fn from(page: Page<Post>) -> Self {
        let num_pages = page.num_pages();
        let has_next = page.has_next();
        let has_previous = page.has_previous();
        let next_page_number = page.next_page_number();
        let previous_page_number = page.previous_page_number();
        let page = page.map(PostView::from);
        Self {
            object_list: page.items,
            number: page.number,
            num_pages,
            count: page.total_count,
            per_page: page.per_page,
            has_next,
            has_previous,
            next_page_number,
            previous_page_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub page_obj: PageView<PostView>,
}

#[derive(Debug, Serialize)]
pub struct GroupListContext {
    pub group: Group,
    pub page_obj: PageView<PostView>,
}

#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub author: Author,
    pub posts_count: u64,
    pub page_obj: PageView<PostView>,
}

impl ProfileContext {
    pub fn new(author: &User, page: Page<Post>) -> Self {
        Self {
            author: Author::from(author),
            posts_count: page.total_count,
            page_obj: page.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub title: String,
    pub post: PostView,
    pub author_posts_count: i64,
    pub is_author: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    CharField,
    ModelChoiceField,
    EmailField,
}

#[derive(Debug, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldView {
    pub kind: FieldKind,
    pub widget: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

impl FieldView {
    fn new(kind: FieldKind, widget: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            kind,
            widget,
            label,
            required,
            value: String::new(),
            choices: None,
        }
    }

    fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

#[derive(Debug, Serialize)]
pub struct FormView {
    pub fields: BTreeMap<&'static str, FieldView>,
    pub errors: FormErrors,
}

impl FormView {
    pub fn post(form: &PostForm, groups: &[Group], errors: FormErrors) -> Self {
        let selected = form.group_id();
        let mut choices = vec![Choice {
            value: String::new(),
            label: "---------".into(),
            selected: selected.is_none(),
        }];
        choices.extend(groups.iter().map(|group| Choice {
            value: group.id.to_string(),
            label: group.to_string(),
            selected: selected == Some(group.id),
        }));

        let mut group = FieldView::new(FieldKind::ModelChoiceField, "select", "Group", false)
            .with_value(form.group.trim());
        group.choices = Some(choices);

        let fields = BTreeMap::from([
            (
                "text",
                FieldView::new(FieldKind::CharField, "textarea", "Text", true)
                    .with_value(form.text.as_str()),
            ),
            ("group", group),
        ]);
        Self { fields, errors }
    }

    pub fn signup(form: &SignupForm, errors: FormErrors) -> Self {
        let fields = BTreeMap::from([
            (
                "username",
                FieldView::new(FieldKind::CharField, "text", "Username", true)
                    .with_value(form.username.as_str()),
            ),
            (
                "email",
                FieldView::new(FieldKind::EmailField, "email", "Email", false)
                    .with_value(form.email.clone().unwrap_or_default()),
            ),
            (
                "password",
                FieldView::new(FieldKind::CharField, "password", "Password", true),
            ),
            (
                "password_confirmation",
                FieldView::new(FieldKind::CharField, "password", "Password confirmation", true),
            ),
        ]);
        Self { fields, errors }
    }

    pub fn login(form: &LoginForm, errors: FormErrors) -> Self {
        let fields = BTreeMap::from([
            (
                "username",
                FieldView::new(FieldKind::CharField, "text", "Username", true)
                    .with_value(form.username.as_str()),
            ),
            (
                "password",
                FieldView::new(FieldKind::CharField, "password", "Password", true),
            ),
        ]);
        Self { fields, errors }
    }
}

#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub form: FormView,
    pub is_edit: bool,
    pub post_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SignupContext {
    pub form: FormView,
}

#[derive(Debug, Serialize)]
pub struct LoginContext {
    pub form: FormView,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoggedOutContext {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::{PageRequest, Paginator};
    use uuid::Uuid;

    fn group(id: i64, title: &str) -> Group {
        Group {
            id,
            title: title.into(),
            slug: format!("g{id}"),
            description: String::new(),
        }
    }

    #[test]
    fn post_form_marks_selected_group() {
        let groups = [group(1, "Тестовая группа"), group(2, "Другая")];
        let form = PostForm {
            text: "text".into(),
            group: "2".into(),
        };
        let view = FormView::post(&form, &groups, FormErrors::default());

        assert_eq!(view.fields["text"].kind, FieldKind::CharField);
        assert!(view.fields["text"].required);
        assert_eq!(view.fields["group"].kind, FieldKind::ModelChoiceField);

        let choices = view.fields["group"].choices.as_ref().unwrap();
        assert_eq!(choices.len(), 3);
        let selected: Vec<_> = choices.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Другая");
    }

    #[test]
    fn signup_form_never_echoes_passwords() {
        let form = SignupForm {
            username: "StasBasov".into(),
            email: None,
            password: "secret-password".into(),
            password_confirmation: "secret-password".into(),
        };
        let view = FormView::signup(&form, FormErrors::default());
        assert_eq!(view.fields["username"].value, "StasBasov");
        assert!(view.fields["password"].value.is_empty());
        assert!(view.fields["password_confirmation"].value.is_empty());
    }

    #[test]
    fn page_view_copies_navigation() {
        let post = Post {
            id: 1,
            author: Author {
                id: Uuid::new_v4(),
                username: "StasBasov".into(),
            },
            text: "Тестовый текст".into(),
            group: None,
            created_at: Utc::now(),
        };
        let page = Paginator::default().page(vec![post], PageRequest::new(2), 11);
        let view = PageView::from(page);
        assert_eq!(view.object_list.len(), 1);
        assert_eq!(view.num_pages, 2);
        assert!(!view.has_next);
        assert_eq!(view.previous_page_number, Some(1));
        assert_eq!(view.object_list[0].display, "Тестовый текст");
    }
}
