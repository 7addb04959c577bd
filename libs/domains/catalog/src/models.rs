use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Rejects names made only of whitespace.
fn validate_nome(nome: &str) -> Result<(), validator::ValidationError> {
    if nome.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub nome: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255), custom(function = "validate_nome"))]
    pub nome: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255), custom(function = "validate_nome"))]
    pub nome: Option<String>,
}

/// Sellable product. `quantidade` mirrors the latest stock update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub nome: String,
    pub preco: f64,
    pub quantidade: i32,
    pub categoria_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255), custom(function = "validate_nome"))]
    pub nome: String,
    #[validate(range(min = 0.0))]
    pub preco: f64,
    #[validate(range(min = 0))]
    pub quantidade: i32,
    pub categoria_id: Uuid,
}

/// Partial product update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255), custom(function = "validate_nome"))]
    pub nome: Option<String>,
    #[validate(range(min = 0.0))]
    pub preco: Option<f64>,
    #[validate(range(min = 0))]
    pub quantidade: Option<i32>,
    pub categoria_id: Option<Uuid>,
}

/// Stock record (estoque) for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: Uuid,
    pub produto_id: Uuid,
    pub quantidade: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStock {
    pub produto_id: Uuid,
    #[validate(range(min = 0))]
    pub quantidade: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStock {
    #[validate(range(min = 0))]
    pub quantidade: i32,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            nome: input.nome,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(nome) = update.nome {
            self.nome = nome;
        }
        self.updated_at = Utc::now();
    }
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            nome: input.nome,
            preco: input.preco,
            quantidade: input.quantidade,
            categoria_id: input.categoria_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(nome) = update.nome {
            self.nome = nome;
        }
        if let Some(preco) = update.preco {
            self.preco = preco;
        }
        if let Some(quantidade) = update.quantidade {
            self.quantidade = quantidade;
        }
        if let Some(categoria_id) = update.categoria_id {
            self.categoria_id = categoria_id;
        }
        self.updated_at = Utc::now();
    }
}

impl Stock {
    pub fn new(input: CreateStock) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            produto_id: input.produto_id,
            quantidade: input.quantidade,
            created_at: now,
            updated_at: now,
        }
    }
}
