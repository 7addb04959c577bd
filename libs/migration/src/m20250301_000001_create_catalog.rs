use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categorias::Table)
                    .if_not_exists()
                    .col(pk_uuid(Categorias::Id))
                    .col(string(Categorias::Nome))
                    .col(
                        timestamp_with_time_zone(Categorias::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Categorias::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Produtos::Table)
                    .if_not_exists()
                    .col(pk_uuid(Produtos::Id))
                    .col(string(Produtos::Nome))
                    .col(double(Produtos::Preco))
                    .col(integer(Produtos::Quantidade).default(0))
                    .col(uuid(Produtos::CategoriaId))
                    .col(
                        timestamp_with_time_zone(Produtos::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Produtos::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_produtos_categoria_id")
                            .from(Produtos::Table, Produtos::CategoriaId)
                            .to(Categorias::Table, Categorias::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Estoques::Table)
                    .if_not_exists()
                    .col(pk_uuid(Estoques::Id))
                    .col(uuid(Estoques::ProdutoId))
                    .col(integer(Estoques::Quantidade))
                    .col(
                        timestamp_with_time_zone(Estoques::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Estoques::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_estoques_produto_id")
                            .from(Estoques::Table, Estoques::ProdutoId)
                            .to(Produtos::Table, Produtos::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Dependent lookups before delete and the FK checks both scan these columns
        manager
            .create_index(
                Index::create()
                    .name("idx_produtos_categoria_id")
                    .table(Produtos::Table)
                    .col(Produtos::CategoriaId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_estoques_produto_id")
                    .table(Estoques::Table)
                    .col(Estoques::ProdutoId)
                    .to_owned(),
            )
            .await?;

        // List endpoints return rows in creation order
        manager
            .create_index(
                Index::create()
                    .name("idx_categorias_created_at")
                    .table(Categorias::Table)
                    .col(Categorias::CreatedAt)
                    .col(Categorias::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_produtos_created_at")
                    .table(Produtos::Table)
                    .col(Produtos::CreatedAt)
                    .col(Produtos::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_estoques_created_at")
                    .table(Estoques::Table)
                    .col(Estoques::CreatedAt)
                    .col(Estoques::Id)
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        db.execute_unprepared(
            "ALTER TABLE categorias ADD CONSTRAINT chk_categorias_nome CHECK (length(btrim(nome)) > 0)",
        )
        .await?;
        db.execute_unprepared(
            r#"
            ALTER TABLE produtos
                ADD CONSTRAINT chk_produtos_nome CHECK (length(btrim(nome)) > 0),
                ADD CONSTRAINT chk_produtos_preco CHECK (preco >= 0),
                ADD CONSTRAINT chk_produtos_quantidade CHECK (quantidade >= 0)
            "#,
        )
        .await?;
        db.execute_unprepared(
            "ALTER TABLE estoques ADD CONSTRAINT chk_estoques_quantidade CHECK (quantidade >= 0)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Estoques::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Produtos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categorias::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categorias {
    Table,
    Id,
    Nome,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Produtos {
    Table,
    Id,
    Nome,
    Preco,
    Quantidade,
    CategoriaId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Estoques {
    Table,
    Id,
    ProdutoId,
    Quantidade,
    CreatedAt,
    UpdatedAt,
}
