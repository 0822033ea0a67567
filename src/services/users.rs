use crate::{
    auth::{policy, AuthService},
    db::DbPool,
    entities::user::{self, Entity as UserEntity},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

/// Service managing identity records
#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a user with a hashed password. The role must exist in the
    /// policy table.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<Uuid, ServiceError> {
        if !policy::ROLES.contains_key(&input.role) {
            return Err(ServiceError::ValidationError(format!(
                "Unknown role '{}'",
                input.role
            )));
        }
        if input.password.len() < 8 {
            return Err(ServiceError::ValidationError(
                "Password must be at least 8 characters".into(),
            ));
        }

        let db = self.db_pool.as_ref();
        let duplicate = UserEntity::find()
            .filter(user::Column::Email.eq(input.email.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        let password_hash = AuthService::hash_password(&input.password)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            name: Set(input.name),
            password_hash: Set(password_hash),
            role: Set(input.role),
            tenant_id: Set(input.tenant_id),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &Uuid) -> Result<Option<user::Model>, ServiceError> {
        UserEntity::find_by_id(*user_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let paginator = UserEntity::find()
            .order_by_asc(user::Column::Email)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let users = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((users, total))
    }

    /// Updates profile fields, role, or active flag. Deactivation stands in
    /// for deletion so audit references stay intact.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<(), ServiceError> {
        if let Some(role) = &input.role {
            if !policy::ROLES.contains_key(role) {
                return Err(ServiceError::ValidationError(format!(
                    "Unknown role '{}'",
                    role
                )));
            }
        }

        let db = self.db_pool.as_ref();
        let mut model = UserEntity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        if let Some(name) = input.name {
            model.name = name;
        }
        if let Some(role) = input.role {
            model.role = role;
        }
        if let Some(active) = input.active {
            model.active = active;
        }
        model.updated_at = Utc::now();

        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }
}
