use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601100002_create_piscinas"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("piscinas"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("nombre")).string().not_null())
                    .col(ColumnDef::new(Alias::new("direccion")).string().not_null())
                    .col(ColumnDef::new(Alias::new("altura")).double().not_null())
                    .col(ColumnDef::new(Alias::new("ancho")).double().not_null())
                    .col(ColumnDef::new(Alias::new("ciudad")).string().not_null())
                    .col(ColumnDef::new(Alias::new("municipio")).string().not_null())
                    .col(ColumnDef::new(Alias::new("temperatura_externa")).double())
                    .col(ColumnDef::new(Alias::new("categoria")).string().not_null())
                    .col(ColumnDef::new(Alias::new("total_profundidades")).integer().not_null())
                    // Ordered float array, kept as JSON alongside the scalars.
                    .col(ColumnDef::new(Alias::new("profundidades")).json().not_null())
                    .col(ColumnDef::new(Alias::new("forma")).string().not_null())
                    .col(ColumnDef::new(Alias::new("uso")).string().not_null())
                    .col(ColumnDef::new(Alias::new("foto")).string().not_null())
                    .col(ColumnDef::new(Alias::new("filtros")).string().not_null())
                    // Nested pump sub-records; they have no lifecycle of their own.
                    .col(ColumnDef::new(Alias::new("bombas")).json().not_null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("piscinas")).to_owned())
            .await
    }
}
