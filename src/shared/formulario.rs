// src/shared/formulario.rs

//! Funções auxiliares para interpretar campos de formulário.

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};

use super::erro::AppError;

/// Mantém apenas os dígitos (CPF, CNPJ e CNAE chegam com máscara).
pub fn somente_digitos(valor: &str) -> String {
    valor.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Devolve o texto sem espaços nas pontas, ou `None` se estiver ausente/vazio.
pub fn texto_preenchido(valor: Option<&str>) -> Option<&str> {
    valor.map(str::trim).filter(|v| !v.is_empty())
}

/// Exige um campo preenchido, com a mensagem de erro indicada.
pub fn obrigatorio<'a>(valor: Option<&'a str>, mensagem: &str) -> Result<&'a str, AppError> {
    texto_preenchido(valor).ok_or_else(|| AppError::validacao(mensagem))
}

pub fn parse_inteiro(valor: &str, mensagem: &str) -> Result<i32, AppError> {
    valor.trim().parse::<i32>().map_err(|_| AppError::validacao(mensagem))
}

/// Converte um valor monetário digitado ("1234,50" ou "1234.50").
///
/// Aceita a vírgula como separador decimal. Não valida o sinal.
pub fn parse_valor(valor: &str) -> Option<BigDecimal> {
    let normalizado = valor.trim().replace(',', ".");
    if normalizado.is_empty() {
        return None;
    }
    BigDecimal::from_str(&normalizado).ok()
}

/// Lê um valor monetário obrigatório e estritamente positivo.
pub fn valor_positivo(valor: Option<&str>) -> Result<BigDecimal, AppError> {
    let bruto = obrigatorio(valor, "Valor é obrigatório!")?;
    let valor = parse_valor(bruto).ok_or_else(|| AppError::validacao("Valor inválido!"))?;
    if valor <= BigDecimal::zero() {
        return Err(AppError::validacao("Valor deve ser maior que zero!"));
    }
    Ok(valor.round(2))
}
