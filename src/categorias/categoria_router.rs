// src/categorias/categoria_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as, query_scalar};

// Importa as structs de categoria
use super::categoria_repository;
use super::categoria_structs::{AtualizaCategoria, Categoria, NovaCategoria};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

fn nome_invalido() -> HttpResponse {
    HttpResponse::BadRequest().json(GenericResponse::erro("Nome da categoria é obrigatório."))
}

/// Rota para cadastrar uma nova categoria.
#[post("/categorias")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    item: web::Json<NovaCategoria>,
) -> HttpResponse {
    let nome = item.nome.trim();
    if nome.is_empty() {
        return nome_invalido();
    }

    let result = query_scalar::<_, i32>(
        "INSERT INTO categoria (nome_categoria, ativo) VALUES ($1, TRUE) RETURNING id_categoria",
    )
    .bind(nome)
    .fetch_one(&data.db_pool)
    .await;

    match result {
        Ok(id) => HttpResponse::Created().json(GenericResponse::sucesso(
            format!("Categoria cadastrada com sucesso! ID: {}", id),
            serde_json::json!({ "id": id }),
        )),
        Err(e) => {
            tracing::error!(erro = ?e, "erro ao inserir categoria");
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao inserir categoria."))
        }
    }
}

/// Rota para listar as categorias ativas.
#[get("/categorias")]
pub async fn buscar_categorias(data: web::Data<AppState>, _usuario: AuthenticatedUser) -> HttpResponse {
    match categoria_repository::listar(&data.db_pool).await {
        Ok(categorias) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Categorias listadas com sucesso!",
            categorias,
        )),
        Err(e) => {
            tracing::error!(erro = ?e, "erro ao buscar categorias");
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao buscar categorias"))
        }
    }
}

/// Rota para listar todas as categorias, inclusive as inativas.
#[get("/categorias/todas")]
pub async fn buscar_todas_categorias(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> HttpResponse {
    match categoria_repository::listar_todas(&data.db_pool).await {
        Ok(categorias) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Categorias listadas com sucesso!",
            categorias,
        )),
        Err(e) => {
            tracing::error!(erro = ?e, "erro ao buscar todas as categorias");
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao buscar categorias"))
        }
    }
}

/// Rota para buscar uma categoria por ID (ativa ou não).
#[get("/categorias/{id}")]
pub async fn buscar_categoria_por_id(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let categoria_result = query_as::<_, Categoria>(
        "SELECT id_categoria, nome_categoria, ativo FROM categoria WHERE id_categoria = $1",
    )
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await;

    match categoria_result {
        Ok(Some(categoria)) => HttpResponse::Ok().json(GenericResponse::sucesso(
            format!("Categoria com ID {} encontrada.", id),
            categoria,
        )),
        Ok(None) => HttpResponse::NotFound()
            .json(GenericResponse::erro(format!("Categoria com ID {} não encontrada.", id))),
        Err(e) => {
            tracing::error!(id, erro = ?e, "erro ao buscar categoria por ID");
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao buscar categoria"))
        }
    }
}

/// Rota para atualizar uma categoria existente.
#[put("/categorias/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<AtualizaCategoria>,
) -> HttpResponse {
    let id = path.into_inner();
    let nome = item.nome.trim();
    if nome.is_empty() {
        return nome_invalido();
    }

    let result = query(
        "UPDATE categoria SET nome_categoria = $1, ativo = COALESCE($2, ativo) WHERE id_categoria = $3",
    )
    .bind(nome)
    .bind(item.ativo)
    .bind(id)
    .execute(&data.db_pool)
    .await;

    match result {
        Ok(res) if res.rows_affected() > 0 => HttpResponse::Ok()
            .json(GenericResponse::ok(format!("Categoria com ID {} atualizada com sucesso.", id))),
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Categoria com ID {} não encontrada para atualização.",
            id
        ))),
        Err(e) => {
            tracing::error!(id, erro = ?e, "erro ao atualizar categoria");
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao atualizar categoria."))
        }
    }
}

/// Rota para excluir uma categoria.
///
/// A exclusão é lógica (`ativo = false`): vendas antigas continuam apontando
/// para ela e os relatórios seguem exibindo o nome.
#[delete("/categorias/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let result = query("UPDATE categoria SET ativo = FALSE WHERE id_categoria = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match result {
        Ok(res) if res.rows_affected() > 0 => HttpResponse::Ok()
            .json(GenericResponse::ok(format!("Categoria com ID {} excluída com sucesso.", id))),
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Categoria com ID {} não encontrada para exclusão.",
            id
        ))),
        Err(e) => {
            tracing::error!(id, erro = ?e, "erro ao excluir categoria");
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao excluir categoria"))
        }
    }
}
