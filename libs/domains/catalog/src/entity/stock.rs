use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{CreateStock, Stock};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "estoques")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub produto_id: Uuid,
    pub quantidade: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProdutoId",
        to = "super::product::Column::Id",
        on_update = "Restrict",
        on_delete = "Restrict"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Stock {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            produto_id: model.produto_id,
            quantidade: model.quantidade,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<CreateStock> for ActiveModel {
    fn from(input: CreateStock) -> Self {
        let stock = Stock::new(input);
        ActiveModel {
            id: Set(stock.id),
            produto_id: Set(stock.produto_id),
            quantidade: Set(stock.quantidade),
            created_at: Set(stock.created_at.into()),
            updated_at: Set(stock.updated_at.into()),
        }
    }
}
