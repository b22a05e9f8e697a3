use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, IntoActiveModel, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents an account in the `users` table.
///
/// The password is stored as an argon2 hash and is never serialized out;
/// `reset_token`/`reset_token_expiry` are short-lived credential-reset
/// artifacts set on request and cleared on a successful reset.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    /// National identification number, unique per user.
    pub identificacion: String,
    /// Unique email address used for login and password recovery.
    pub correo: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub rol: Rol,
    pub estado: Estado,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Rol {
    #[strum(serialize = "ADMIN")]
    #[sea_orm(string_value = "ADMIN")]
    #[serde(rename = "ADMIN")]
    Admin,
    #[strum(serialize = "USER")]
    #[sea_orm(string_value = "USER")]
    #[serde(rename = "USER")]
    User,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Estado {
    #[strum(serialize = "activo")]
    #[sea_orm(string_value = "activo")]
    #[serde(rename = "activo")]
    Activo,
    #[strum(serialize = "inactivo")]
    #[sea_orm(string_value = "inactivo")]
    #[serde(rename = "inactivo")]
    Inactivo,
}

impl Estado {
    pub fn toggled(self) -> Self {
        match self {
            Estado::Activo => Estado::Inactivo,
            Estado::Inactivo => Estado::Activo,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Hashes a plaintext password with argon2 and a fresh salt.
    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))
    }

    /// Verifies a plaintext password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Inserts a new user with a hashed password. The unique indexes on
    /// `correo` and `identificacion` are the authoritative duplicate guard.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DatabaseConnection,
        nombre: &str,
        apellido: &str,
        identificacion: &str,
        correo: &str,
        password: &str,
        rol: Rol,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            nombre: Set(nombre.to_owned()),
            apellido: Set(apellido.to_owned()),
            identificacion: Set(identificacion.to_owned()),
            correo: Set(correo.to_owned()),
            password_hash: Set(Self::hash_password(password)?),
            rol: Set(rol),
            estado: Set(Estado::Activo),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        active.insert(db).await
    }

    pub async fn find_by_correo(
        db: &DatabaseConnection,
        correo: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Correo.eq(correo))
            .one(db)
            .await
    }

    pub async fn find_by_identificacion(
        db: &DatabaseConnection,
        identificacion: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Identificacion.eq(identificacion))
            .one(db)
            .await
    }

    pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    /// Stores a freshly issued reset token along with its expiry timestamp.
    pub async fn store_reset_token(
        &self,
        db: &DatabaseConnection,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let mut active = self.clone().into_active_model();
        active.reset_token = Set(Some(token.to_owned()));
        active.reset_token_expiry = Set(Some(expiry));
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Replaces the password hash and clears any outstanding reset token.
    pub async fn reset_password(
        &self,
        db: &DatabaseConnection,
        new_password: &str,
    ) -> Result<Self, DbErr> {
        let mut active = self.clone().into_active_model();
        active.password_hash = Set(Self::hash_password(new_password)?);
        active.reset_token = Set(None);
        active.reset_token_expiry = Set(None);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn toggle_estado(&self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        let mut active = self.clone().into_active_model();
        active.estado = Set(self.estado.toggled());
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}
