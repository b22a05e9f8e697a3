use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a swimming pool in the `piscinas` table.
///
/// `profundidades` and `bombas` are stored as JSON columns: pumps exist only
/// nested inside their pool and have no identity or lifecycle of their own.
/// Wire names follow the original Spanish camelCase contract.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "piscinas")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nombre: String,
    pub direccion: String,
    /// Height in meters, strictly positive.
    pub altura: f64,
    /// Width in meters, strictly positive.
    pub ancho: f64,
    pub ciudad: String,
    pub municipio: String,
    pub temperatura_externa: Option<f64>,
    pub categoria: Categoria,
    /// Declared number of depth measurements; must equal `profundidades.len()`.
    pub total_profundidades: i32,
    /// Strictly ascending depth sequence, in meters.
    pub profundidades: Profundidades,
    pub forma: Forma,
    pub uso: Uso,
    /// Public URL of the main pool photo.
    pub foto: String,
    pub filtros: String,
    /// Non-empty pump array.
    pub bombas: Bombas,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Categoria {
    #[strum(serialize = "Niños")]
    #[sea_orm(string_value = "Niños")]
    #[serde(rename = "Niños")]
    Ninos,
    #[strum(serialize = "Adultos")]
    #[sea_orm(string_value = "Adultos")]
    Adultos,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Forma {
    #[strum(serialize = "Rectangular")]
    #[sea_orm(string_value = "Rectangular")]
    Rectangular,
    #[strum(serialize = "Circular")]
    #[sea_orm(string_value = "Circular")]
    Circular,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Uso {
    #[strum(serialize = "Privada")]
    #[sea_orm(string_value = "Privada")]
    Privada,
    #[strum(serialize = "Publica")]
    #[sea_orm(string_value = "Publica")]
    Publica,
}

/// Pump material; lives inside the `bombas` JSON column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
pub enum MaterialBomba {
    Sumergible,
    Centrifuga,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
pub enum SeRepite {
    #[strum(serialize = "si")]
    #[serde(rename = "si")]
    Si,
    #[strum(serialize = "no")]
    #[serde(rename = "no")]
    No,
}

/// Equipment sub-record nested within a pool, with its compliance documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bomba {
    pub marca: String,
    pub referencia: String,
    pub potencia: f64,
    pub material: MaterialBomba,
    pub se_repite: SeRepite,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bombas: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foto_bomba: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoja_seguridad: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ficha_tecnica: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Profundidades(pub Vec<f64>);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Bombas(pub Vec<Bomba>);

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Deletes the pool and reports whether a row was actually removed.
    pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
