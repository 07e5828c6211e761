// src/usuarios/auth_middleware.rs

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    dev::Payload,
    web, FromRequest, HttpRequest,
};
use chrono::Utc;
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

// Importa as Claims do módulo de structs de usuário
use super::usuario_structs::{Claims, Usuario};
use crate::shared::erro::AppError;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Nome do cookie que guarda o token de sessão.
pub const COOKIE_SESSAO: &str = "token";

/// Usuário autenticado, extraído do token de sessão.
/// Rotas protegidas recebem este tipo como parâmetro.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub user_name: String,
    pub user_cpf: String,
}

/// Gera o token de sessão assinado (HS256) com validade de `minutos`.
pub fn gerar_token(usuario: &Usuario, segredo: &str, minutos: i64) -> Result<String, AppError> {
    let claims = Claims {
        sub: usuario.id_usuario,
        name: usuario.nome.clone(),
        cpf: usuario.cpf.clone(),
        exp: Utc::now().timestamp() + minutos * 60,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(segredo.as_ref()),
    )?;
    Ok(token)
}

/// Valida o token e devolve o usuário autenticado.
pub fn validar_token(token: &str, segredo: &str) -> Result<AuthenticatedUser, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(segredo.as_ref()), &validation)
        .map_err(|e| {
            let mensagem = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Sessão expirada.",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "Assinatura do token inválida.",
                jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                _ => "Token de sessão inválido.",
            };
            AppError::NaoAutenticado(mensagem.to_string())
        })?;

    Ok(AuthenticatedUser {
        user_id: token_data.claims.sub,
        user_name: token_data.claims.name,
        user_cpf: token_data.claims.cpf,
    })
}

/// Cookie HttpOnly com o token, expirando junto com a sessão.
pub fn cookie_sessao(token: String, minutos: i64) -> Cookie<'static> {
    Cookie::build(COOKIE_SESSAO, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(minutos))
        .finish()
}

/// Cookie que apaga a sessão (logout).
pub fn cookie_logout() -> Cookie<'static> {
    let mut cookie = Cookie::new(COOKIE_SESSAO, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Procura o token no cookie de sessão e, na falta dele, no cabeçalho
/// `Authorization: Bearer <token>`.
fn token_da_requisicao(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(COOKIE_SESSAO) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

/// Extrator de autenticação para Actix Web.
/// Sem token válido a requisição vira um redirecionamento para `/login`.
impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Acessa o AppState para obter a chave secreta
        let jwt_secret = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.jwt_secret.clone(),
            None => {
                tracing::error!("AppState não disponível no extrator de autenticação");
                return ready(Err(AppError::NaoAutenticado(
                    "Erro de configuração do servidor.".to_string(),
                )));
            }
        };

        let resultado = match token_da_requisicao(req) {
            Some(token) => validar_token(&token, &jwt_secret),
            None => Err(AppError::NaoAutenticado("Usuário não logado.".to_string())),
        };

        if let Err(ref e) = resultado {
            tracing::debug!(caminho = %req.path(), erro = %e, "acesso sem sessão válida");
        }
        ready(resultado)
    }
}
