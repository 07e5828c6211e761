// src/shared/shared_structs.rs

use serde::Serialize;

use super::flash::Flash;

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
    /// Mensagem flash pendente (sucesso/erro da ação anterior), consumida nesta resposta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

impl<T> GenericResponse<T> {
    pub fn sucesso(message: impl Into<String>, body: T) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
            flash: None,
        }
    }

    pub fn com_flash(mut self, flash: Option<Flash>) -> Self {
        self.flash = flash;
        self
    }
}

impl GenericResponse<()> {
    pub fn erro(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "error".to_string(),
            message: message.into(),
            body: None,
            flash: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: None,
            flash: None,
        }
    }
}
