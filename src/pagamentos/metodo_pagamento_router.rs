// src/pagamentos/metodo_pagamento_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};

use super::pagamento_repository;
use super::pagamento_structs::{AtualizaMetodo, NovoMetodo};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

fn descricao_invalida() -> HttpResponse {
    HttpResponse::BadRequest().json(GenericResponse::erro("Descrição do método de pagamento é obrigatória."))
}

/// Rota para cadastrar um método de pagamento.
#[post("/metodos-pagamento")]
pub async fn cadastrar_metodo(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    item: web::Json<NovoMetodo>,
) -> HttpResponse {
    let descricao = item.descricao.trim();
    if descricao.is_empty() {
        return descricao_invalida();
    }

    match pagamento_repository::inserir_metodo(&data.db_pool, descricao).await {
        Ok(id) => HttpResponse::Created().json(GenericResponse::sucesso(
            format!("Método de pagamento cadastrado com sucesso! ID: {}", id),
            serde_json::json!({ "id": id }),
        )),
        Err(e) => {
            e.registrar("cadastrar método de pagamento");
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao inserir método de pagamento."))
        }
    }
}

/// Rota para listar os métodos ativos.
#[get("/metodos-pagamento")]
pub async fn buscar_metodos(data: web::Data<AppState>, _usuario: AuthenticatedUser) -> HttpResponse {
    match pagamento_repository::listar_metodos(&data.db_pool).await {
        Ok(metodos) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Métodos de pagamento listados com sucesso!",
            metodos,
        )),
        Err(e) => {
            e.registrar("listar métodos de pagamento");
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao buscar métodos de pagamento"))
        }
    }
}

#[get("/metodos-pagamento/{id}")]
pub async fn buscar_metodo_por_id(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    match pagamento_repository::buscar_metodo(&data.db_pool, id).await {
        Ok(Some(metodo)) => HttpResponse::Ok().json(GenericResponse::sucesso(
            format!("Método de pagamento com ID {} encontrado.", id),
            metodo,
        )),
        Ok(None) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Método de pagamento com ID {} não encontrado.",
            id
        ))),
        Err(e) => {
            e.registrar("buscar método de pagamento");
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao buscar método de pagamento"))
        }
    }
}

#[put("/metodos-pagamento/{id}")]
pub async fn atualizar_metodo(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<AtualizaMetodo>,
) -> HttpResponse {
    let id = path.into_inner();
    let descricao = item.descricao.trim();
    if descricao.is_empty() {
        return descricao_invalida();
    }

    match pagamento_repository::atualizar_metodo(&data.db_pool, id, descricao, item.ativo).await {
        Ok(true) => HttpResponse::Ok().json(GenericResponse::ok(format!(
            "Método de pagamento com ID {} atualizado com sucesso.",
            id
        ))),
        Ok(false) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Método de pagamento com ID {} não encontrado para atualização.",
            id
        ))),
        Err(e) => {
            e.registrar("atualizar método de pagamento");
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao atualizar método de pagamento."))
        }
    }
}

/// Exclusão lógica: pagamentos antigos continuam exibindo o método.
#[delete("/metodos-pagamento/{id}")]
pub async fn deletar_metodo(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    match pagamento_repository::excluir_metodo(&data.db_pool, id).await {
        Ok(true) => HttpResponse::Ok().json(GenericResponse::ok(format!(
            "Método de pagamento com ID {} excluído com sucesso.",
            id
        ))),
        Ok(false) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Método de pagamento com ID {} não encontrado para exclusão.",
            id
        ))),
        Err(e) => {
            e.registrar("excluir método de pagamento");
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao excluir método de pagamento"))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};

    use crate::shared::teste_util::{cookie_autenticado, estado_teste};

    #[actix_web::test]
    async fn metodo_sem_descricao_e_rejeitado() {
        let app = test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = test::TestRequest::put()
            .uri("/metodos-pagamento/3")
            .cookie(cookie_autenticado())
            .set_json(serde_json::json!({ "descricao": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
