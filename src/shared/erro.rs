// src/shared/erro.rs

use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::GenericResponse;

/// Código SQLSTATE do Postgres para violação de UNIQUE.
const VIOLACAO_UNICA: &str = "23505";
/// Código SQLSTATE do Postgres para violação de chave estrangeira.
const VIOLACAO_CHAVE_ESTRANGEIRA: &str = "23503";

/// Erro único da aplicação.
///
/// As variantes de domínio carregam a mensagem que pode ser mostrada ao usuário.
/// As variantes de infraestrutura são convertidas automaticamente com `?` e só
/// aparecem por inteiro no log.
#[derive(Debug, Error)]
pub enum AppError {
    /// Campo de formulário ausente ou inválido.
    #[error("{0}")]
    Validacao(String),
    #[error("{0}")]
    NaoEncontrado(String),
    /// Sessão ausente, expirada ou adulterada.
    #[error("{0}")]
    NaoAutenticado(String),
    /// Violação de unicidade (CPF, e-mail, número de nota fiscal).
    #[error("{0}")]
    Conflito(String),
    #[error("Erro no banco de dados: {0}")]
    Banco(#[from] sqlx::Error),
    #[error("Erro ao processar senha: {0}")]
    Senha(#[from] bcrypt::BcryptError),
    #[error("Erro no token de sessão: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Erro ao gerar PDF: {0}")]
    Pdf(String),
}

impl AppError {
    pub fn validacao(mensagem: impl Into<String>) -> Self {
        AppError::Validacao(mensagem.into())
    }

    pub fn nao_encontrado(mensagem: impl Into<String>) -> Self {
        AppError::NaoEncontrado(mensagem.into())
    }

    /// Mensagem segura para exibir ao usuário (flash ou corpo JSON).
    pub fn mensagem_usuario(&self) -> String {
        match self {
            AppError::Validacao(m)
            | AppError::NaoEncontrado(m)
            | AppError::NaoAutenticado(m)
            | AppError::Conflito(m) => m.clone(),
            AppError::Pdf(_) => "Erro ao gerar PDF. Tente novamente.".to_string(),
            _ => "Erro no sistema. Tente novamente.".to_string(),
        }
    }

    /// Registra o erro no log com o nível adequado.
    pub fn registrar(&self, contexto: &str) {
        match self {
            AppError::Validacao(_) | AppError::NaoEncontrado(_) | AppError::Conflito(_) => {
                tracing::warn!(contexto, erro = %self, "requisição rejeitada")
            }
            AppError::NaoAutenticado(_) => tracing::debug!(contexto, erro = %self, "sem sessão"),
            _ => tracing::error!(contexto, erro = ?self, "falha interna"),
        }
    }
}

/// Traduz violações de restrição do banco para mensagens de domínio.
///
/// `unica` é usada para UNIQUE e `chave_estrangeira` para FK; os demais erros
/// seguem como `AppError::Banco`.
pub fn traduzir_violacao(e: sqlx::Error, unica: &str, chave_estrangeira: &str) -> AppError {
    let codigo = e
        .as_database_error()
        .and_then(|db| db.code())
        .map(|c| c.into_owned());

    match codigo.as_deref() {
        Some(VIOLACAO_UNICA) => AppError::Conflito(unica.to_string()),
        Some(VIOLACAO_CHAVE_ESTRANGEIRA) => AppError::Validacao(chave_estrangeira.to_string()),
        _ => AppError::Banco(e),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validacao(_) => StatusCode::BAD_REQUEST,
            AppError::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            AppError::Conflito(_) => StatusCode::CONFLICT,
            AppError::NaoAutenticado(_) => StatusCode::SEE_OTHER,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.registrar("resposta");
        match self {
            AppError::NaoAutenticado(_) => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            _ => HttpResponse::build(self.status_code())
                .json(GenericResponse::erro(self.mensagem_usuario())),
        }
    }
}
