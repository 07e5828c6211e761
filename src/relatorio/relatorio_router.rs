// src/relatorio/relatorio_router.rs

use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};
use chrono::Local;

use super::relatorio_pdf;
use super::relatorio_structs::{DadosRelatorio, PaginaRelatorio, RelatorioForm, RelatorioQuery, TotaisRelatorio};
use crate::historico::historico_structs::anos_disponiveis;
use crate::shared::erro::AppError;
use crate::shared::flash::{redirecionar_com_erro, redirecionar_com_flash, responder_pagina, Flash};
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::usuarios::usuario_repository;
use crate::vendas::periodo::{ano_atual, ano_no_calendario};
use crate::vendas::vendas_repository;
use crate::AppState;

/// Página do relatório: anos com vendas e o resumo mensal do ano escolhido.
#[get("/relatorio")]
pub async fn exibir_relatorio(
    req: HttpRequest,
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    consulta: web::Query<RelatorioQuery>,
) -> Result<HttpResponse, AppError> {
    let atual = ano_atual();
    let ano = consulta.ano.as_deref().and_then(ano_no_calendario).unwrap_or(atual);

    let anos = vendas_repository::listar_anos_com_vendas(&data.db_pool, usuario.user_id).await?;
    let resumo_mensal = vendas_repository::resumo_mensal(&data.db_pool, usuario.user_id, ano).await?;

    Ok(responder_pagina(
        &req,
        "Relatório mensal",
        PaginaRelatorio { ano, anos: anos_disponiveis(anos, atual), resumo_mensal },
    ))
}

/// Gera o PDF do mês pedido.
#[post("/relatorio")]
pub async fn gerar_relatorio(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    form: web::Form<RelatorioForm>,
) -> HttpResponse {
    let (mes, ano) = match form.validar() {
        Ok(p) => p,
        Err(e) => return redirecionar_com_erro("/relatorio", &e, "gerar relatório"),
    };

    match montar_relatorio(&data, &usuario, mes, ano).await {
        Ok(Some(dados)) => match relatorio_pdf::gerar(&dados) {
            Ok(bytes) => {
                tracing::info!(usuario_id = usuario.user_id, mes, ano, vendas = dados.vendas.len(), "relatório gerado");
                HttpResponse::Ok()
                    .content_type("application/pdf")
                    .insert_header((
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", dados.nome_arquivo()),
                    ))
                    .body(bytes)
            }
            Err(e) => redirecionar_com_erro("/relatorio", &e, "gerar relatório"),
        },
        Ok(None) => redirecionar_com_flash(
            "/relatorio",
            Flash::erro("Nenhuma venda encontrada para o período selecionado."),
        ),
        Err(e) => redirecionar_com_erro("/relatorio", &e, "gerar relatório"),
    }
}

/// `None` quando não há vendas no período.
async fn montar_relatorio(
    data: &AppState,
    usuario: &AuthenticatedUser,
    mes: u32,
    ano: i32,
) -> Result<Option<DadosRelatorio>, AppError> {
    let vendas = vendas_repository::listar_por_mes_ano(&data.db_pool, usuario.user_id, mes, ano).await?;
    if vendas.is_empty() {
        return Ok(None);
    }

    let cadastro = usuario_repository::buscar_por_id(&data.db_pool, usuario.user_id)
        .await?
        .ok_or_else(|| AppError::NaoAutenticado("Usuário da sessão não existe mais.".to_string()))?;

    let totais = TotaisRelatorio::calcular(&vendas);
    Ok(Some(DadosRelatorio {
        nome: cadastro.nome,
        cpf: cadastro.cpf,
        mes,
        ano,
        vendas,
        totais,
        emitido_em: Local::now().date_naive(),
    }))
}
