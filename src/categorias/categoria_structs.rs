// src/categorias/categoria_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura para receber dados de uma nova categoria na requisição POST
#[derive(Deserialize)]
pub struct NovaCategoria {
    pub nome: String,
}

/// Dados aceitos na atualização (PUT). `ativo` ausente mantém o valor atual.
#[derive(Deserialize)]
pub struct AtualizaCategoria {
    pub nome: String,
    pub ativo: Option<bool>,
}

/// Estrutura que representa uma categoria no banco de dados
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Categoria {
    pub id_categoria: i32,
    pub nome_categoria: String,
    pub ativo: bool,
}
