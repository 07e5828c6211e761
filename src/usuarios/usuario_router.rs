// src/usuarios/usuario_router.rs

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::Serialize;
use std::sync::OnceLock;

use super::auth_middleware::{cookie_logout, cookie_sessao, gerar_token, AuthenticatedUser};
use super::usuario_repository;
use super::usuario_structs::{CadastroForm, LoginForm};
use crate::shared::erro::AppError;
use crate::shared::flash::{
    redirecionar, redirecionar_com_erro, redirecionar_com_flash, responder_pagina, Flash,
};
use crate::shared::formulario::somente_digitos;
use crate::AppState;

#[derive(Serialize)]
struct PaginaAcesso {
    pagina: &'static str,
}

/// Página de login. Quem já está logado vai direto para o painel.
#[get("/login")]
pub async fn exibir_login(req: HttpRequest, usuario: Option<AuthenticatedUser>) -> HttpResponse {
    if usuario.is_some() {
        return redirecionar("/dashboard");
    }
    responder_pagina(&req, "Login", PaginaAcesso { pagina: "login" })
}

/// Página de cadastro.
#[get("/cadastro")]
pub async fn exibir_cadastro(req: HttpRequest, usuario: Option<AuthenticatedUser>) -> HttpResponse {
    if usuario.is_some() {
        return redirecionar("/dashboard");
    }
    responder_pagina(&req, "Cadastro", PaginaAcesso { pagina: "cadastro" })
}

/// Autentica pelo CPF e senha e grava o cookie de sessão.
#[post("/login")]
pub async fn processar_login(data: web::Data<AppState>, form: web::Form<LoginForm>) -> HttpResponse {
    match autenticar(&data, &form).await {
        Ok(token) => {
            HttpResponse::SeeOther()
                .insert_header((actix_web::http::header::LOCATION, "/dashboard"))
                .cookie(cookie_sessao(token, data.sessao_minutos))
                .finish()
        }
        Err(e) => redirecionar_com_erro("/login", &e, "login"),
    }
}

/// Hash de uma senha qualquer, verificado quando o CPF não existe para que
/// a resposta leve o mesmo tempo de um CPF cadastrado com senha errada.
fn hash_ficticio() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash("senha-inexistente", DEFAULT_COST).unwrap_or_default())
}

async fn autenticar(data: &AppState, form: &LoginForm) -> Result<String, AppError> {
    let cpf = form.cpf.as_deref().map(somente_digitos).unwrap_or_default();
    let senha = form.senha.as_deref().unwrap_or_default();
    if cpf.is_empty() || senha.is_empty() {
        return Err(AppError::validacao("CPF e senha são obrigatórios"));
    }

    let credenciais_invalidas = || AppError::validacao("CPF ou senha incorretos");

    // 1. Buscar o usuário pelo CPF
    let usuario = match usuario_repository::buscar_por_cpf(&data.db_pool, &cpf).await? {
        Some(u) => u,
        None => {
            let _ = verify(senha, hash_ficticio());
            return Err(credenciais_invalidas());
        }
    };

    // 2. Verificar a senha
    if !verify(senha, &usuario.senha)? {
        return Err(credenciais_invalidas());
    }

    // 3. Gerar token de sessão
    let token = gerar_token(&usuario, &data.jwt_secret, data.sessao_minutos)?;
    tracing::info!(usuario_id = usuario.id_usuario, "login realizado");
    Ok(token)
}

/// Cadastra um novo usuário.
#[post("/cadastro")]
pub async fn processar_cadastro(
    data: web::Data<AppState>,
    form: web::Form<CadastroForm>,
) -> HttpResponse {
    match cadastrar(&data, &form).await {
        Ok(id) => {
            tracing::info!(usuario_id = id, "usuário cadastrado");
            redirecionar_com_flash("/login", Flash::sucesso("Cadastro realizado com sucesso! Faça login."))
        }
        Err(e) => redirecionar_com_erro("/cadastro", &e, "cadastro"),
    }
}

async fn cadastrar(data: &AppState, form: &CadastroForm) -> Result<i32, AppError> {
    let novo = form.validar()?;

    // 1. CPF e e-mail precisam ser inéditos
    if usuario_repository::buscar_por_cpf(&data.db_pool, &novo.cpf).await?.is_some() {
        return Err(AppError::Conflito("CPF já cadastrado no sistema!".to_string()));
    }
    if let Some(email) = &novo.email {
        if usuario_repository::buscar_por_email(&data.db_pool, email).await?.is_some() {
            return Err(AppError::Conflito("Email já cadastrado no sistema!".to_string()));
        }
    }

    // 2. Hash da senha
    let senha_hash = hash(&novo.senha, DEFAULT_COST)?;

    // 3. Inserir
    usuario_repository::inserir(&data.db_pool, &novo, &senha_hash).await
}

/// Encerra a sessão.
#[get("/logout")]
pub async fn logout(usuario: Option<AuthenticatedUser>) -> HttpResponse {
    if let Some(u) = usuario {
        tracing::info!(usuario_id = u.user_id, "logout");
    }
    HttpResponse::SeeOther()
        .insert_header((actix_web::http::header::LOCATION, "/login"))
        .cookie(cookie_logout())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test as actix_test, App};

    use crate::shared::flash::{Flash, COOKIE_FLASH};
    use crate::shared::teste_util::{cookie_autenticado, estado_teste};

    #[test]
    fn hash_ficticio_e_bcrypt_valido() {
        let ficticio = hash_ficticio();
        assert!(ficticio.starts_with("$2b$12$"));
        assert!(!verify("123456", ficticio).unwrap());
    }

    #[actix_web::test]
    async fn login_sem_senha_volta_com_erro() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::post()
            .uri("/login")
            .set_form([("cpf", "123.456.789-09"), ("senha", "")])
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("location").unwrap(), "/login");
        let flash = resp.response().cookies().find(|c| c.name() == COOKIE_FLASH).unwrap();
        assert_eq!(
            Flash::decodificar(flash.value()),
            Some(Flash::erro("CPF e senha são obrigatórios"))
        );
    }

    #[actix_web::test]
    async fn cadastro_invalido_nao_toca_no_banco() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::post()
            .uri("/cadastro")
            .set_form([
                ("cpf", "12345678909"),
                ("nome", "Maria"),
                ("senha", "segredo1"),
                ("confirmarSenha", "segredo2"),
            ])
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.headers().get("location").unwrap(), "/cadastro");
        let flash = resp.response().cookies().find(|c| c.name() == COOKIE_FLASH).unwrap();
        assert_eq!(Flash::decodificar(flash.value()), Some(Flash::erro("Senhas não coincidem!")));
    }

    #[actix_web::test]
    async fn logado_e_redirecionado_do_login_para_o_painel() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::get()
            .uri("/login")
            .cookie(cookie_autenticado())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.headers().get("location").unwrap(), "/dashboard");
    }

    #[actix_web::test]
    async fn logout_apaga_o_cookie_de_sessao() {
        let app = actix_test::init_service(App::new().app_data(estado_teste()).configure(crate::rotas::configurar)).await;
        let req = actix_test::TestRequest::get()
            .uri("/logout")
            .cookie(cookie_autenticado())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.headers().get("location").unwrap(), "/login");
        let sessao = resp.response().cookies().find(|c| c.name() == "token").unwrap();
        assert_eq!(sessao.value(), "");
    }
}
