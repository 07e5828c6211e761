// src/config.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Variável de ambiente obrigatória ausente: {0}")]
    VariavelAusente(String),
    #[error("Valor inválido para a variável de ambiente {var}: {motivo}")]
    ValorInvalido { var: String, motivo: String },
}

/// Configuração lida do ambiente (e do `.env`, carregado em `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub sessao_minutos: i64,
    pub db_max_conexoes: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_fn(|chave| std::env::var(chave).ok())
    }

    /// Monta a configuração a partir de uma fonte qualquer de variáveis.
    fn from_fn(ler: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let obrigatoria = |chave: &str| {
            ler(chave)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::VariavelAusente(chave.to_string()))
        };

        let sessao_minutos = numero(&ler, "SESSAO_MINUTOS", 30i64)?;
        if sessao_minutos <= 0 {
            return Err(ConfigError::ValorInvalido {
                var: "SESSAO_MINUTOS".to_string(),
                motivo: "deve ser maior que zero".to_string(),
            });
        }

        Ok(Self {
            database_url: obrigatoria("DATABASE_URL")?,
            jwt_secret: obrigatoria("JWT_SECRET")?,
            bind_addr: ler("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            sessao_minutos,
            db_max_conexoes: numero(&ler, "DB_MAX_CONEXOES", 5u32)?,
        })
    }
}

fn numero<T>(ler: &impl Fn(&str) -> Option<String>, chave: &str, padrao: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match ler(chave) {
        None => Ok(padrao),
        Some(valor) => valor.trim().parse::<T>().map_err(|e| ConfigError::ValorInvalido {
            var: chave.to_string(),
            motivo: e.to_string(),
        }),
    }
}
