// src/usuarios/usuario_repository.rs

use sqlx::{query, query_as, query_scalar, PgPool};

use super::usuario_structs::{DadosMei, DadosPessoais, NovoUsuario, Usuario};
use crate::shared::erro::{traduzir_violacao, AppError};

const COLUNAS: &str = "id_usuario, cpf, nome, email, cnpj, senha, atividade, cnae";

pub async fn buscar_por_cpf(pool: &PgPool, cpf: &str) -> Result<Option<Usuario>, AppError> {
    let usuario = query_as::<_, Usuario>(&format!("SELECT {COLUNAS} FROM usuario WHERE cpf = $1"))
        .bind(cpf)
        .fetch_optional(pool)
        .await?;
    Ok(usuario)
}

pub async fn buscar_por_email(pool: &PgPool, email: &str) -> Result<Option<Usuario>, AppError> {
    let usuario = query_as::<_, Usuario>(&format!("SELECT {COLUNAS} FROM usuario WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(usuario)
}

pub async fn buscar_por_id(pool: &PgPool, id: i32) -> Result<Option<Usuario>, AppError> {
    let usuario = query_as::<_, Usuario>(&format!("SELECT {COLUNAS} FROM usuario WHERE id_usuario = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(usuario)
}

/// Insere o usuário; `senha_hash` já deve ser o hash bcrypt.
pub async fn inserir(pool: &PgPool, novo: &NovoUsuario, senha_hash: &str) -> Result<i32, AppError> {
    let id = query_scalar::<_, i32>(
        "INSERT INTO usuario (cpf, nome, email, cnpj, senha) VALUES ($1, $2, $3, $4, $5) RETURNING id_usuario",
    )
    .bind(&novo.cpf)
    .bind(&novo.nome)
    .bind(&novo.email)
    .bind(&novo.cnpj)
    .bind(senha_hash)
    .fetch_one(pool)
    .await
    // Cobre a corrida entre a verificação prévia e o INSERT.
    .map_err(|e| traduzir_violacao(e, "CPF ou email já cadastrado no sistema!", "Dados inválidos"))?;
    Ok(id)
}

pub async fn atualizar_dados(pool: &PgPool, id: i32, dados: &DadosPessoais) -> Result<(), AppError> {
    query("UPDATE usuario SET nome = $1, email = $2, cnpj = $3 WHERE id_usuario = $4")
        .bind(&dados.nome)
        .bind(&dados.email)
        .bind(&dados.cnpj)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| traduzir_violacao(e, "Email já cadastrado no sistema!", "Usuário inválido"))?;
    Ok(())
}

pub async fn atualizar_senha(pool: &PgPool, id: i32, senha_hash: &str) -> Result<(), AppError> {
    query("UPDATE usuario SET senha = $1 WHERE id_usuario = $2")
        .bind(senha_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn atualizar_mei(pool: &PgPool, id: i32, dados: &DadosMei) -> Result<(), AppError> {
    query("UPDATE usuario SET atividade = $1, cnae = $2 WHERE id_usuario = $3")
        .bind(&dados.atividade)
        .bind(&dados.cnae)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
