// src/usuarios/usuario_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::erro::AppError;
use crate::shared::formulario::{obrigatorio, somente_digitos, texto_preenchido};

pub const TAMANHO_MINIMO_SENHA: usize = 6;

/// Estrutura que representa um usuário no banco de dados.
/// A senha é armazenada como hash bcrypt.
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id_usuario: i32,
    pub cpf: String,
    pub nome: String,
    pub email: Option<String>,
    pub cnpj: Option<String>,
    pub senha: String,
    pub atividade: Option<String>,
    pub cnae: Option<String>,
}

/// Dados do usuário expostos nas páginas (sem o hash da senha).
#[derive(Debug, Serialize)]
pub struct UsuarioPerfil {
    pub id: i32,
    pub cpf: String,
    pub nome: String,
    pub email: Option<String>,
    pub cnpj: Option<String>,
    pub atividade: Option<String>,
    pub cnae: Option<String>,
}

impl From<Usuario> for UsuarioPerfil {
    fn from(u: Usuario) -> Self {
        UsuarioPerfil {
            id: u.id_usuario,
            cpf: u.cpf,
            nome: u.nome,
            email: u.email,
            cnpj: u.cnpj,
            atividade: u.atividade,
            cnae: u.cnae,
        }
    }
}

/// Formulário de login.
#[derive(Deserialize)]
pub struct LoginForm {
    pub cpf: Option<String>,
    pub senha: Option<String>,
}

/// Formulário de cadastro de um novo usuário.
#[derive(Deserialize, Default)]
pub struct CadastroForm {
    pub cpf: Option<String>,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub cnpj: Option<String>,
    pub senha: Option<String>,
    #[serde(rename = "confirmarSenha")]
    pub confirmar_senha: Option<String>,
}

/// Cadastro já validado e normalizado, pronto para gerar o hash e inserir.
#[derive(Debug, PartialEq, Eq)]
pub struct NovoUsuario {
    pub cpf: String,
    pub nome: String,
    pub email: Option<String>,
    pub cnpj: Option<String>,
    pub senha: String,
}

impl CadastroForm {
    pub fn validar(&self) -> Result<NovoUsuario, AppError> {
        let cpf = obrigatorio(self.cpf.as_deref(), "CPF é obrigatório!")?;
        let nome = obrigatorio(self.nome.as_deref(), "Nome é obrigatório!")?;
        let senha = self
            .senha
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validacao("Senha é obrigatória!"))?;
        let confirmar = self
            .confirmar_senha
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validacao("Confirmação de senha é obrigatória!"))?;

        let cpf = somente_digitos(cpf);
        if cpf.len() != 11 {
            return Err(AppError::validacao("CPF deve ter 11 dígitos!"));
        }
        let cnpj = normalizar_cnpj(self.cnpj.as_deref())?;

        validar_nova_senha(senha, confirmar, "Senhas não coincidem!")?;

        Ok(NovoUsuario {
            cpf,
            nome: nome.to_string(),
            email: texto_preenchido(self.email.as_deref()).map(str::to_string),
            cnpj,
            senha: senha.to_string(),
        })
    }
}

/// CNPJ opcional: vazio vira `None`; preenchido precisa ter 14 dígitos.
pub fn normalizar_cnpj(cnpj: Option<&str>) -> Result<Option<String>, AppError> {
    match texto_preenchido(cnpj) {
        None => Ok(None),
        Some(bruto) => {
            let cnpj = somente_digitos(bruto);
            if cnpj.len() != 14 {
                return Err(AppError::validacao("CNPJ deve ter 14 dígitos!"));
            }
            Ok(Some(cnpj))
        }
    }
}

pub fn validar_nova_senha(senha: &str, confirmar: &str, msg_diferentes: &str) -> Result<(), AppError> {
    if senha.chars().count() < TAMANHO_MINIMO_SENHA {
        return Err(AppError::validacao(format!(
            "Senha deve ter no mínimo {} caracteres!",
            TAMANHO_MINIMO_SENHA
        )));
    }
    if senha != confirmar {
        return Err(AppError::validacao(msg_diferentes));
    }
    Ok(())
}

/// Formulário da página de perfil. `acao` escolhe qual bloco está sendo enviado.
#[derive(Deserialize, Default)]
pub struct PerfilForm {
    pub acao: Option<String>,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub cnpj: Option<String>,
    #[serde(rename = "senhaAtual")]
    pub senha_atual: Option<String>,
    #[serde(rename = "novaSenha")]
    pub nova_senha: Option<String>,
    #[serde(rename = "confirmarSenha")]
    pub confirmar_senha: Option<String>,
    pub atividade: Option<String>,
    pub cnae: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DadosPessoais {
    pub nome: String,
    pub email: String,
    pub cnpj: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DadosMei {
    pub atividade: String,
    pub cnae: Option<String>,
}

impl PerfilForm {
    pub fn dados_pessoais(&self) -> Result<DadosPessoais, AppError> {
        let nome = obrigatorio(self.nome.as_deref(), "Nome não pode estar vazio")?;
        let email = texto_preenchido(self.email.as_deref())
            .filter(|e| e.contains('@'))
            .ok_or_else(|| AppError::validacao("Email inválido"))?;
        Ok(DadosPessoais {
            nome: nome.to_string(),
            email: email.to_string(),
            cnpj: normalizar_cnpj(self.cnpj.as_deref())?,
        })
    }

    pub fn dados_mei(&self) -> Result<DadosMei, AppError> {
        let atividade = obrigatorio(self.atividade.as_deref(), "Atividade é obrigatória")?;
        let cnae = match texto_preenchido(self.cnae.as_deref()) {
            None => None,
            Some(bruto) => {
                let cnae = somente_digitos(bruto);
                if cnae.len() != 7 {
                    return Err(AppError::validacao("CNAE deve ter 7 dígitos!"));
                }
                Some(cnae)
            }
        };
        Ok(DadosMei { atividade: atividade.to_string(), cnae })
    }
}

/// Payload do token de sessão (JWT).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,     // ID do usuário
    pub name: String, // Nome exibido no painel
    pub cpf: String,
    pub exp: i64, // Expiração (timestamp Unix)
}
