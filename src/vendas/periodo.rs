// src/vendas/periodo.rs

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

fn inicio_do_dia(data: NaiveDate) -> Option<NaiveDateTime> {
    data.and_hms_opt(0, 0, 0)
}

/// Intervalo semiaberto `[início do mês, início do mês seguinte)`.
/// `None` para mês fora de 1..=12 ou ano fora do calendário suportado.
pub fn intervalo_do_mes(ano: i32, mes: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let inicio = NaiveDate::from_ymd_opt(ano, mes, 1)?;
    let (ano_seguinte, mes_seguinte) = if mes == 12 { (ano + 1, 1) } else { (ano, mes + 1) };
    let fim = NaiveDate::from_ymd_opt(ano_seguinte, mes_seguinte, 1)?;
    Some((inicio_do_dia(inicio)?, inicio_do_dia(fim)?))
}

/// Intervalo semiaberto do ano inteiro.
pub fn intervalo_do_ano(ano: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let inicio = NaiveDate::from_ymd_opt(ano, 1, 1)?;
    let fim = NaiveDate::from_ymd_opt(ano + 1, 1, 1)?;
    Some((inicio_do_dia(inicio)?, inicio_do_dia(fim)?))
}

/// Ano digitado, desde que caiba no calendário usado nas consultas.
pub fn ano_no_calendario(texto: &str) -> Option<i32> {
    let ano = texto.trim().parse::<i32>().ok()?;
    intervalo_do_ano(ano).map(|_| ano)
}

/// Data e hora locais, como gravadas em `data_vendas`.
pub fn agora() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn ano_atual() -> i32 {
    Local::now().year()
}
