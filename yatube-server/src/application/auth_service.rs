use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::forms::{LoginForm, SignupForm};
use crate::data::user_repository::UserRepository;
use crate::domain::error::{DomainError, FormErrors};
use crate::domain::user::User;
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn authenticate(&self, token: &str) -> Result<Option<User>, DomainError> {
        let Some(user_id) = self.keys.verify_token(token).ok().and_then(|c| c.user_id()) else {
            return Ok(None);
        };
        self.repo.find_by_id(user_id).await
    }

    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn register(&self, form: &SignupForm) -> Result<User, DomainError> {
        let cleaned = form.check()?;

        if self.repo.find_by_username(&cleaned.username).await?.is_some() {
            return Err(username_taken());
        }

        let hash = hash_password(&cleaned.password)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = User::new(cleaned.username, cleaned.email, hash);
        match self.repo.create(user).await {
            Err(DomainError::UserAlreadyExists(_)) => Err(username_taken()),
            other => other,
        }
    }

    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn login(&self, form: &LoginForm) -> Result<(User, String), DomainError> {
        form.check()?;

        let user = self
            .repo
            .find_by_username(form.username.trim())
            .await?
            .ok_or_else(invalid_credentials)?;

        let valid = verify_password(&form.password, &user.password_hash)
            .map_err(|_| invalid_credentials())?;
        if !valid {
            return Err(invalid_credentials());
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    pub fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        self.keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }
}

fn username_taken() -> DomainError {
    let mut errors = FormErrors::default();
    errors.add("username", "A user with that username already exists.");
    DomainError::InvalidForm(errors)
}

fn invalid_credentials() -> DomainError {
    let mut errors = FormErrors::default();
    errors.add(
        FormErrors::NON_FIELD,
        "Please enter a correct username and password.",
    );
    DomainError::InvalidForm(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use uuid::Uuid;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryStore::new()),
            JwtKeys::new("test-secret".into(), 1).unwrap(),
        )
    }

    fn signup(username: &str) -> SignupForm {
        SignupForm {
            username: username.into(),
            email: None,
            password: "password123".into(),
            password_confirmation: "password123".into(),
        }
    }

    fn login(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.into(),
            password: password.into(),
            next: None,
        }
    }

    #[tokio::test]
    async fn registered_user_can_log_in() {
        let service = service();
        let user = service.register(&signup("StasBasov")).await.unwrap();

        let (logged_in, token) = service.login(&login("StasBasov", "password123")).await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let resolved = service.authenticate(&token).await.unwrap().unwrap();
        assert_eq!(resolved.username, "StasBasov");
    }

    #[tokio::test]
    async fn duplicate_username_is_a_form_error() {
        let service = service();
        service.register(&signup("StasBasov")).await.unwrap();
        let Err(DomainError::InvalidForm(errors)) = service.register(&signup("StasBasov")).await
        else {
            panic!("expected form errors");
        };
        assert!(errors.has("username"));
    }

    #[tokio::test]
    async fn wrong_password_is_a_non_field_error() {
        let service = service();
        service.register(&signup("StasBasov")).await.unwrap();
        for form in [login("StasBasov", "wrong-password"), login("nobody", "password123")] {
            let Err(DomainError::InvalidForm(errors)) = service.login(&form).await else {
                panic!("expected form errors");
            };
            assert!(errors.has(FormErrors::NON_FIELD));
        }
    }

    #[tokio::test]
    async fn bad_tokens_are_anonymous() {
        let service = service();
        assert!(service.authenticate("garbage").await.unwrap().is_none());

        let stranger = service.keys().generate_token(Uuid::new_v4()).unwrap();
        assert!(service.authenticate(&stranger).await.unwrap().is_none());
    }
}
