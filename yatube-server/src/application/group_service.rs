use std::sync::Arc;

use tracing::instrument;

use crate::application::forms::GroupForm;
use crate::data::group_repository::GroupRepository;
use crate::domain::error::DomainError;
use crate::domain::group::{Group, NewGroup};

#[derive(Clone)]
pub struct GroupService {
    repo: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, form), fields(slug = %form.slug))]
    pub async fn create_group(&self, form: &GroupForm) -> Result<Group, DomainError> {
        let cleaned = form.check()?;
        self.repo
            .create(NewGroup {
                title: cleaned.title,
                slug: cleaned.slug,
                description: cleaned.description,
            })
            .await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        self.repo.list().await
    }
}
