// src/vendas/venda_router.rs

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::vendas_repository;
use super::vendas_structs::{Venda, VendaForm};
use crate::categorias::categoria_repository;
use crate::categorias::categoria_structs::Categoria;
use crate::shared::erro::AppError;
use crate::shared::flash::{redirecionar_com_erro, redirecionar_com_flash, responder_pagina, Flash};
use crate::shared::formulario::{obrigatorio, parse_inteiro};
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Parâmetros de `/venda?acao=...&id=...`.
#[derive(Deserialize, Default)]
pub struct VendaQuery {
    pub acao: Option<String>,
    pub id: Option<String>,
}

/// Dados da página de venda: categorias ativas e, na edição, a venda.
#[derive(Serialize)]
struct PaginaVenda {
    categorias: Vec<Categoria>,
    venda: Option<Venda>,
}

fn id_da_venda(id: Option<&str>) -> Result<i32, AppError> {
    let id = obrigatorio(id, "ID da venda não informado!")?;
    parse_inteiro(id, "ID inválido!")
}

/// Valida e grava uma venda nova. Devolve a mensagem de sucesso.
///
/// Usada também pelo cadastro rápido do painel.
pub(crate) async fn registrar_venda(
    data: &AppState,
    usuario: &AuthenticatedUser,
    form: &VendaForm,
) -> Result<String, AppError> {
    let dados = form.validar()?;
    let id = vendas_repository::inserir(&data.db_pool, usuario.user_id, &dados).await?;
    tracing::debug!(venda_id = id, "cadastro concluído");

    Ok(match &dados.numero_nf {
        Some(numero) => format!("Venda cadastrada com sucesso! (Nota Fiscal: {})", numero),
        None => "Venda cadastrada com sucesso!".to_string(),
    })
}

/// Formulário de venda, edição ou exclusão, conforme `acao`.
#[get("/venda")]
pub async fn exibir_venda(
    req: HttpRequest,
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    consulta: web::Query<VendaQuery>,
) -> Result<HttpResponse, AppError> {
    match consulta.acao.as_deref() {
        Some("editar") => {
            let id = match id_da_venda(consulta.id.as_deref()) {
                Ok(id) => id,
                Err(e) => return Ok(redirecionar_com_erro("/historico", &e, "editar venda")),
            };
            let venda = match vendas_repository::buscar(&data.db_pool, usuario.user_id, id).await? {
                Some(v) => v,
                None => {
                    return Ok(redirecionar_com_flash("/historico", Flash::erro("Venda não encontrada!")))
                }
            };
            let categorias = categoria_repository::listar(&data.db_pool).await?;
            Ok(responder_pagina(&req, "Editar venda", PaginaVenda { categorias, venda: Some(venda) }))
        }
        Some("excluir") => {
            let id = match id_da_venda(consulta.id.as_deref()) {
                Ok(id) => id,
                Err(e) => return Ok(redirecionar_com_erro("/historico", &e, "excluir venda")),
            };
            let flash = match vendas_repository::excluir(&data.db_pool, usuario.user_id, id).await {
                Ok(true) => {
                    tracing::info!(venda_id = id, usuario_id = usuario.user_id, "venda excluída");
                    Flash::sucesso("Venda excluída com sucesso!")
                }
                Ok(false) => Flash::erro("Venda não encontrada!"),
                Err(e) => {
                    e.registrar("excluir venda");
                    Flash::erro(e.mensagem_usuario())
                }
            };
            Ok(redirecionar_com_flash("/historico", flash))
        }
        _ => {
            let categorias = categoria_repository::listar(&data.db_pool).await?;
            Ok(responder_pagina(&req, "Nova venda", PaginaVenda { categorias, venda: None }))
        }
    }
}

/// Cadastro (padrão) ou edição (`acao=editar`, na URL ou no formulário).
#[post("/venda")]
pub async fn salvar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    consulta: web::Query<VendaQuery>,
    form: web::Form<VendaForm>,
) -> HttpResponse {
    let acao = consulta.acao.as_deref().or(form.acao.as_deref());

    if acao == Some("editar") {
        return editar_venda(&data, &usuario, &consulta, &form).await;
    }

    match registrar_venda(&data, &usuario, &form).await {
        Ok(mensagem) => redirecionar_com_flash("/dashboard", Flash::sucesso(mensagem)),
        Err(e) => redirecionar_com_erro("/venda", &e, "cadastrar venda"),
    }
}

async fn editar_venda(
    data: &AppState,
    usuario: &AuthenticatedUser,
    consulta: &VendaQuery,
    form: &VendaForm,
) -> HttpResponse {
    let id = match id_da_venda(form.id.as_deref().or(consulta.id.as_deref())) {
        Ok(id) => id,
        Err(e) => return redirecionar_com_erro("/historico", &e, "editar venda"),
    };
    let volta = format!("/venda?acao=editar&id={}", id);

    let dados = match form.validar() {
        Ok(d) => d,
        Err(e) => return redirecionar_com_erro(&volta, &e, "editar venda"),
    };

    match vendas_repository::editar(&data.db_pool, usuario.user_id, id, &dados).await {
        Ok(()) => redirecionar_com_flash("/historico", Flash::sucesso("Venda atualizada com sucesso!")),
        Err(e) => redirecionar_com_erro(&volta, &e, "editar venda"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test as actix_test, App};

    use crate::shared::flash::COOKIE_FLASH;
    use crate::shared::teste_util::{cookie_autenticado, estado_teste};

    fn flash_da_resposta(resp: &actix_web::dev::ServiceResponse) -> Option<Flash> {
        resp.response()
            .cookies()
            .find(|c| c.name() == COOKIE_FLASH)
            .and_then(|c| Flash::decodificar(c.value()))
    }

    #[test]
    fn id_ausente_ou_invalido() {
        assert_eq!(id_da_venda(None).unwrap_err().mensagem_usuario(), "ID da venda não informado!");
        assert_eq!(id_da_venda(Some("x1")).unwrap_err().mensagem_usuario(), "ID inválido!");
        assert_eq!(id_da_venda(Some(" 42 ")).unwrap(), 42);
    }

    #[actix_web::test]
    async fn venda_sem_nota_numerada_volta_para_o_formulario() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::post()
            .uri("/venda")
            .cookie(cookie_autenticado())
            .set_form([("categoria", "1"), ("valor", "50,00"), ("emitirNF", "S")])
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("location").unwrap(), "/venda");
        assert_eq!(
            flash_da_resposta(&resp),
            Some(Flash::erro("Número da Nota Fiscal é obrigatório!"))
        );
    }

    #[actix_web::test]
    async fn edicao_com_valor_invalido_volta_para_a_edicao() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::post()
            .uri("/venda?acao=editar")
            .cookie(cookie_autenticado())
            .set_form([("id", "15"), ("categoria", "1"), ("valor", "-3")])
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.headers().get("location").unwrap(), "/venda?acao=editar&id=15");
        assert_eq!(flash_da_resposta(&resp), Some(Flash::erro("Valor deve ser maior que zero!")));
    }

    #[actix_web::test]
    async fn edicao_sem_id_vai_para_o_historico() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::post()
            .uri("/venda")
            .cookie(cookie_autenticado())
            .set_form([("acao", "editar"), ("categoria", "1"), ("valor", "10")])
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.headers().get("location").unwrap(), "/historico");
        assert_eq!(flash_da_resposta(&resp), Some(Flash::erro("ID da venda não informado!")));
    }

    #[actix_web::test]
    async fn exclusao_com_id_invalido_vai_para_o_historico() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::get()
            .uri("/venda?acao=excluir&id=abc")
            .cookie(cookie_autenticado())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.headers().get("location").unwrap(), "/historico");
        assert_eq!(flash_da_resposta(&resp), Some(Flash::erro("ID inválido!")));
    }

    #[actix_web::test]
    async fn venda_exige_sessao() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::post()
            .uri("/venda")
            .set_form([("categoria", "1"), ("valor", "10")])
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("location").unwrap(), "/login");
    }
}
