use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{Category, CreateCategory};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categorias")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nome: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            nome: model.nome,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<CreateCategory> for ActiveModel {
    fn from(input: CreateCategory) -> Self {
        let category = Category::new(input);
        ActiveModel {
            id: Set(category.id),
            nome: Set(category.nome),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
        }
    }
}
