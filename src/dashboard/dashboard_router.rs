// src/dashboard/dashboard_router.rs

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::Local;
use serde::Serialize;

use crate::categorias::categoria_repository;
use crate::categorias::categoria_structs::Categoria;
use crate::shared::erro::AppError;
use crate::shared::flash::{redirecionar_com_erro, redirecionar_com_flash, responder_pagina, Flash};
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::vendas::venda_router::registrar_venda;
use crate::vendas::vendas_repository;
use crate::vendas::vendas_structs::{Venda, VendaForm};
use crate::AppState;

/// Quantidade de vendas recentes exibidas no painel.
const ULTIMAS_VENDAS: i64 = 10;

#[derive(Serialize)]
struct UsuarioResumo {
    id: i32,
    nome: String,
    cpf: String,
}

#[derive(Serialize)]
struct Painel {
    usuario: UsuarioResumo,
    categorias: Vec<Categoria>,
    ultimas_vendas: Vec<Venda>,
    total_mes: BigDecimal,
}

#[get("/dashboard")]
pub async fn exibir_dashboard(
    req: HttpRequest,
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let categorias = categoria_repository::listar(&data.db_pool).await?;
    let ultimas_vendas =
        vendas_repository::listar_por_usuario(&data.db_pool, usuario.user_id, ULTIMAS_VENDAS).await?;
    let total_mes =
        vendas_repository::calcular_total_mes(&data.db_pool, usuario.user_id, Local::now().date_naive()).await?;

    let painel = Painel {
        usuario: UsuarioResumo {
            id: usuario.user_id,
            nome: usuario.user_name,
            cpf: usuario.user_cpf,
        },
        categorias,
        ultimas_vendas,
        total_mes,
    };
    Ok(responder_pagina(&req, "Dashboard", painel))
}

/// Cadastro rápido de venda. Sempre volta ao painel.
#[post("/dashboard")]
pub async fn venda_rapida(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    form: web::Form<VendaForm>,
) -> HttpResponse {
    match registrar_venda(&data, &usuario, &form).await {
        Ok(mensagem) => redirecionar_com_flash("/dashboard", Flash::sucesso(mensagem)),
        Err(e) => redirecionar_com_erro("/dashboard", &e, "venda rápida"),
    }
}
