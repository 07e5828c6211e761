// src/vendas/nota_fiscal_router.rs

use actix_web::{get, web, HttpResponse};

use super::vendas_repository;
use crate::shared::erro::AppError;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Notas fiscais ativas do usuário, mais recentes primeiro.
#[get("/notas-fiscais")]
pub async fn listar_notas(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let notas = vendas_repository::listar_notas_por_usuario(&data.db_pool, usuario.user_id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Notas fiscais listadas com sucesso!", notas)))
}

#[get("/notas-fiscais/{id}")]
pub async fn buscar_nota(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let nota = vendas_repository::buscar_nota(&data.db_pool, usuario.user_id, id)
        .await?
        .ok_or_else(|| AppError::nao_encontrado(format!("Nota fiscal com ID {} não encontrada.", id)))?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Nota fiscal com ID {} encontrada.", id),
        nota,
    )))
}
