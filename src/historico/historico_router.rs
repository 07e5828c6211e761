// src/historico/historico_router.rs

use actix_web::{get, post, web, HttpRequest, HttpResponse};

use super::historico_structs::{anos_disponiveis, FiltroHistorico, PaginaHistorico, ResumoHistorico};
use crate::shared::erro::AppError;
use crate::shared::flash::responder_pagina;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::vendas::periodo::ano_atual;
use crate::vendas::vendas_repository;
use crate::AppState;

async fn montar_historico(
    req: &HttpRequest,
    data: &AppState,
    usuario: &AuthenticatedUser,
    filtro: FiltroHistorico,
) -> Result<HttpResponse, AppError> {
    let atual = ano_atual();
    let ano = filtro.ano_ou(atual);
    let filtro_nf = filtro.filtro();

    let anos = vendas_repository::listar_anos_com_vendas(&data.db_pool, usuario.user_id).await?;
    let vendas =
        vendas_repository::listar_por_ano_com_filtro_nf(&data.db_pool, usuario.user_id, ano, filtro_nf).await?;
    let resumo = ResumoHistorico::calcular(&vendas);

    Ok(responder_pagina(
        req,
        "Histórico de vendas",
        PaginaHistorico {
            ano,
            filtro_nf,
            anos: anos_disponiveis(anos, atual),
            vendas,
            resumo,
        },
    ))
}

#[get("/historico")]
pub async fn exibir_historico(
    req: HttpRequest,
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    consulta: web::Query<FiltroHistorico>,
) -> Result<HttpResponse, AppError> {
    montar_historico(&req, &data, &usuario, consulta.into_inner()).await
}

/// Mesmo resultado do GET, com os filtros vindos do formulário.
#[post("/historico")]
pub async fn filtrar_historico(
    req: HttpRequest,
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    consulta: web::Query<FiltroHistorico>,
    form: Option<web::Form<FiltroHistorico>>,
) -> Result<HttpResponse, AppError> {
    let filtro = match form {
        Some(f) => consulta.into_inner().mesclar(f.into_inner()),
        None => consulta.into_inner(),
    };
    montar_historico(&req, &data, &usuario, filtro).await
}
