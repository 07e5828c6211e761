// src/shared/flash.rs

use actix_web::{
    cookie::{Cookie, SameSite},
    http::header,
    HttpRequest, HttpResponse,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use super::erro::AppError;

/// Nome do cookie que carrega a mensagem entre o redirecionamento e a próxima página.
pub const COOKIE_FLASH: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoFlash {
    Sucesso,
    Erro,
}

/// Mensagem de uso único exibida na página seguinte a um POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub tipo: TipoFlash,
    pub mensagem: String,
}

impl Flash {
    pub fn sucesso(mensagem: impl Into<String>) -> Self {
        Flash { tipo: TipoFlash::Sucesso, mensagem: mensagem.into() }
    }

    pub fn erro(mensagem: impl Into<String>) -> Self {
        Flash { tipo: TipoFlash::Erro, mensagem: mensagem.into() }
    }

    /// Serializa como JSON em base64 url-safe, que é um valor de cookie válido
    /// mesmo com acentos e espaços.
    pub fn codificar(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decodificar(valor: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(valor).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Lê a mensagem pendente da requisição, se houver.
    pub fn ler(req: &HttpRequest) -> Option<Self> {
        req.cookie(COOKIE_FLASH)
            .and_then(|c| Flash::decodificar(c.value()))
    }

    pub fn para_cookie(&self) -> Cookie<'static> {
        Cookie::build(COOKIE_FLASH, self.codificar())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish()
    }
}

fn cookie_de_remocao() -> Cookie<'static> {
    let mut cookie = Cookie::new(COOKIE_FLASH, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// 303 See Other para `destino`.
pub fn redirecionar(destino: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, destino))
        .finish()
}

/// Redireciona gravando a mensagem flash.
pub fn redirecionar_com_flash(destino: &str, flash: Flash) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, destino))
        .cookie(flash.para_cookie())
        .finish()
}

/// Redireciona com a mensagem de erro apropriada para o usuário.
pub fn redirecionar_com_erro(destino: &str, erro: &AppError, contexto: &str) -> HttpResponse {
    erro.registrar(contexto);
    redirecionar_com_flash(destino, Flash::erro(erro.mensagem_usuario()))
}

/// Resposta de página: envelope JSON com a flash pendente, removendo o cookie
/// para que a mensagem apareça só uma vez.
pub fn responder_pagina<T: Serialize>(
    req: &HttpRequest,
    message: &str,
    corpo: T,
) -> HttpResponse {
    let flash = Flash::ler(req);
    let mut resposta = HttpResponse::Ok();
    if flash.is_some() {
        resposta.cookie(cookie_de_remocao());
    }
    resposta.json(
        super::shared_structs::GenericResponse::sucesso(message, corpo).com_flash(flash),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn flash_com_acentos_sobrevive_ao_cookie() {
        let flash = Flash::erro("Número da Nota Fiscal é obrigatório!");
        let valor = flash.codificar();
        assert!(valor.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(Flash::decodificar(&valor), Some(flash));
    }

    #[test]
    fn cookie_adulterado_e_ignorado() {
        assert_eq!(Flash::decodificar("!!nao-base64!!"), None);
        assert_eq!(Flash::decodificar(&URL_SAFE_NO_PAD.encode(b"{}")), None);
    }

    #[test]
    fn redirecionamento_grava_cookie_flash() {
        let resposta = redirecionar_com_flash("/venda", Flash::sucesso("ok"));
        assert_eq!(resposta.status(), actix_web::http::StatusCode::SEE_OTHER);
        let cookie = resposta.cookies().find(|c| c.name() == COOKIE_FLASH).unwrap();
        assert_eq!(Flash::decodificar(cookie.value()), Some(Flash::sucesso("ok")));
    }

    #[test]
    fn pagina_consume_a_flash() {
        let req = TestRequest::default()
            .cookie(Cookie::new(COOKIE_FLASH, Flash::sucesso("feito").codificar()))
            .to_http_request();
        let resposta = responder_pagina(&req, "Página", ());
        let removido = resposta.cookies().find(|c| c.name() == COOKIE_FLASH).unwrap();
        assert_eq!(removido.value(), "");
    }
}
