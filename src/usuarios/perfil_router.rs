// src/usuarios/perfil_router.rs

use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};

use super::auth_middleware::{cookie_sessao, gerar_token, AuthenticatedUser};
use super::usuario_repository;
use super::usuario_structs::{validar_nova_senha, PerfilForm, Usuario, UsuarioPerfil};
use crate::shared::erro::AppError;
use crate::shared::flash::{redirecionar_com_erro, responder_pagina, Flash};
use crate::AppState;

/// Ações aceitas pelo formulário de perfil.
#[derive(Debug, PartialEq, Eq)]
enum AcaoPerfil {
    AtualizarDados,
    AlterarSenha,
    AtualizarMei,
}

impl AcaoPerfil {
    fn de(acao: Option<&str>) -> Option<Self> {
        match acao.unwrap_or("") {
            "" | "atualizarDados" => Some(AcaoPerfil::AtualizarDados),
            "alterarSenha" => Some(AcaoPerfil::AlterarSenha),
            "atualizarMEI" => Some(AcaoPerfil::AtualizarMei),
            _ => None,
        }
    }
}

async fn carregar_usuario(data: &AppState, id: i32) -> Result<Usuario, AppError> {
    usuario_repository::buscar_por_id(&data.db_pool, id)
        .await?
        .ok_or_else(|| AppError::NaoAutenticado("Usuário da sessão não existe mais.".to_string()))
}

/// Página de perfil.
#[get("/perfil")]
pub async fn exibir_perfil(
    req: HttpRequest,
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let atual = carregar_usuario(&data, usuario.user_id).await?;
    Ok(responder_pagina(&req, "Perfil", UsuarioPerfil::from(atual)))
}

/// Salva uma das seções do perfil, conforme o campo `acao`.
#[post("/perfil")]
pub async fn salvar_perfil(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    form: web::Form<PerfilForm>,
) -> HttpResponse {
    let acao = match AcaoPerfil::de(form.acao.as_deref()) {
        Some(a) => a,
        None => return redirecionar_com_erro("/perfil", &AppError::validacao("Ação inválida"), "perfil"),
    };

    let resultado = match acao {
        AcaoPerfil::AtualizarDados => atualizar_dados(&data, &usuario, &form).await,
        AcaoPerfil::AlterarSenha => alterar_senha(&data, &usuario, &form).await.map(|m| (m, None)),
        AcaoPerfil::AtualizarMei => atualizar_mei(&data, &usuario, &form).await.map(|m| (m, None)),
    };

    match resultado {
        Ok((mensagem, novo_token)) => {
            let mut resposta = HttpResponse::SeeOther();
            resposta
                .insert_header((header::LOCATION, "/perfil"))
                .cookie(Flash::sucesso(mensagem).para_cookie());
            if let Some(token) = novo_token {
                resposta.cookie(cookie_sessao(token, data.sessao_minutos));
            }
            resposta.finish()
        }
        Err(e) => redirecionar_com_erro("/perfil", &e, "perfil"),
    }
}

/// Atualiza nome, e-mail e CNPJ. Reemite o token para refletir o novo nome.
async fn atualizar_dados(
    data: &AppState,
    usuario: &AuthenticatedUser,
    form: &PerfilForm,
) -> Result<(&'static str, Option<String>), AppError> {
    let dados = form.dados_pessoais()?;

    if let Some(outro) = usuario_repository::buscar_por_email(&data.db_pool, &dados.email).await? {
        if outro.id_usuario != usuario.user_id {
            return Err(AppError::Conflito("Email já cadastrado no sistema!".to_string()));
        }
    }

    usuario_repository::atualizar_dados(&data.db_pool, usuario.user_id, &dados).await?;
    let atualizado = carregar_usuario(data, usuario.user_id).await?;
    let token = gerar_token(&atualizado, &data.jwt_secret, data.sessao_minutos)?;
    Ok(("Dados atualizados com sucesso!", Some(token)))
}

async fn alterar_senha(
    data: &AppState,
    usuario: &AuthenticatedUser,
    form: &PerfilForm,
) -> Result<&'static str, AppError> {
    let senha_atual = form
        .senha_atual
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validacao("Senha atual é obrigatória"))?;

    let atual = carregar_usuario(data, usuario.user_id).await?;
    if !verify(senha_atual, &atual.senha)? {
        return Err(AppError::validacao("Senha atual incorreta"));
    }

    let nova = form
        .nova_senha
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validacao("Nova senha é obrigatória"))?;
    validar_nova_senha(nova, form.confirmar_senha.as_deref().unwrap_or_default(), "Senhas não conferem")?;

    let senha_hash = hash(nova, DEFAULT_COST)?;
    usuario_repository::atualizar_senha(&data.db_pool, usuario.user_id, &senha_hash).await?;
    tracing::info!(usuario_id = usuario.user_id, "senha alterada");
    Ok("Senha alterada com sucesso!")
}

async fn atualizar_mei(
    data: &AppState,
    usuario: &AuthenticatedUser,
    form: &PerfilForm,
) -> Result<&'static str, AppError> {
    let dados = form.dados_mei()?;
    usuario_repository::atualizar_mei(&data.db_pool, usuario.user_id, &dados).await?;
    Ok("Dados do MEI atualizados!")
}
