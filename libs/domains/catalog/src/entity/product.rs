use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{CreateProduct, Product};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "produtos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nome: String,
    pub preco: f64,
    pub quantidade: i32,
    pub categoria_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoriaId",
        to = "super::category::Column::Id",
        on_update = "Restrict",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::stock::Entity")]
    Stock,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            nome: model.nome,
            preco: model.preco,
            quantidade: model.quantidade,
            categoria_id: model.categoria_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<CreateProduct> for ActiveModel {
    fn from(input: CreateProduct) -> Self {
        let product = Product::new(input);
        ActiveModel {
            id: Set(product.id),
            nome: Set(product.nome),
            preco: Set(product.preco),
            quantidade: Set(product.quantidade),
            categoria_id: Set(product.categoria_id),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        }
    }
}
