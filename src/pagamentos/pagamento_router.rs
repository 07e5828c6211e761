// src/pagamentos/pagamento_router.rs

use actix_web::{get, post, web, HttpResponse};

use super::pagamento_repository;
use super::pagamento_structs::{PagamentoForm, SituacaoPagamentos};
use crate::shared::erro::AppError;
use crate::shared::flash::{redirecionar_com_erro, redirecionar_com_flash, Flash};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Pagamentos da venda, total pago, saldo restante e se está quitada.
#[get("/vendas/{id}/pagamentos")]
pub async fn listar_pagamentos(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let venda_id = path.into_inner();
    let valor_venda = pagamento_repository::valor_da_venda(&data.db_pool, usuario.user_id, venda_id)
        .await?
        .ok_or_else(|| AppError::nao_encontrado("Venda não encontrada!"))?;
    let pagamentos = pagamento_repository::listar_por_venda(&data.db_pool, venda_id).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Pagamentos da venda",
        SituacaoPagamentos::calcular(venda_id, valor_venda, pagamentos),
    )))
}

#[post("/vendas/{id}/pagamentos")]
pub async fn registrar_pagamento(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    form: web::Form<PagamentoForm>,
) -> HttpResponse {
    let venda_id = path.into_inner();
    let novo = match form.validar() {
        Ok(n) => n,
        Err(e) => return redirecionar_com_erro("/historico", &e, "registrar pagamento"),
    };

    match pagamento_repository::inserir(&data.db_pool, usuario.user_id, venda_id, &novo).await {
        Ok(_) => redirecionar_com_flash("/historico", Flash::sucesso("Pagamento registrado com sucesso!")),
        Err(e) => redirecionar_com_erro("/historico", &e, "registrar pagamento"),
    }
}

#[post("/pagamentos/{id}/excluir")]
pub async fn excluir_pagamento(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    match pagamento_repository::excluir(&data.db_pool, usuario.user_id, id).await {
        Ok(true) => redirecionar_com_flash("/historico", Flash::sucesso("Pagamento excluído com sucesso!")),
        Ok(false) => redirecionar_com_flash("/historico", Flash::erro("Pagamento não encontrado!")),
        Err(e) => redirecionar_com_erro("/historico", &e, "excluir pagamento"),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    use crate::shared::flash::{Flash, COOKIE_FLASH};
    use crate::shared::teste_util::{cookie_autenticado, estado_teste};

    #[actix_web::test]
    async fn pagamento_com_valor_zero_volta_com_erro() {
        let app = test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = test::TestRequest::post()
            .uri("/vendas/4/pagamentos")
            .cookie(cookie_autenticado())
            .set_form([("metodo", "2"), ("valor", "0,00")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get("location").unwrap(), "/historico");
        let flash = resp.response().cookies().find(|c| c.name() == COOKIE_FLASH).unwrap();
        assert_eq!(
            Flash::decodificar(flash.value()),
            Some(Flash::erro("Valor deve ser maior que zero!"))
        );
    }
}
