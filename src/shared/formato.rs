// src/shared/formato.rs

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

const MESES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// Nome do mês em português (1 = Janeiro). `None` fora de 1..=12.
pub fn nome_mes(mes: u32) -> Option<&'static str> {
    MESES.get(mes.checked_sub(1)? as usize).copied()
}

/// "12345678909" -> "123.456.789-09". Outros tamanhos voltam sem alteração.
pub fn formatar_cpf(cpf: &str) -> String {
    if cpf.len() != 11 || !cpf.chars().all(|c| c.is_ascii_digit()) {
        return cpf.to_string();
    }
    format!("{}.{}.{}-{}", &cpf[0..3], &cpf[3..6], &cpf[6..9], &cpf[9..11])
}

pub fn formatar_data(data: &NaiveDateTime) -> String {
    data.format("%d/%m/%Y").to_string()
}

/// Formata no padrão brasileiro: `R$ 1.234,56`.
pub fn formatar_moeda(valor: &BigDecimal) -> String {
    let texto = valor.round(2).to_string();
    let (sinal, texto) = match texto.strip_prefix('-') {
        Some(resto) => ("-", resto.to_string()),
        None => ("", texto),
    };
    let (inteiro, fracao) = match texto.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (texto.clone(), String::new()),
    };
    let fracao = format!("{:0<2}", fracao);

    let digitos: Vec<char> = inteiro.chars().collect();
    let mut agrupado = String::with_capacity(digitos.len() + digitos.len() / 3);
    for (i, c) in digitos.iter().enumerate() {
        if i > 0 && (digitos.len() - i) % 3 == 0 {
            agrupado.push('.');
        }
        agrupado.push(*c);
    }

    format!("R$ {}{},{}", sinal, agrupado, &fracao[..2])
}
