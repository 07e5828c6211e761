// src/pagamentos/pagamento_structs.rs

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::erro::AppError;
use crate::shared::formulario::{obrigatorio, parse_inteiro, valor_positivo};

/// Estrutura para receber um novo método de pagamento (POST)
#[derive(Deserialize)]
pub struct NovoMetodo {
    pub descricao: String,
}

/// Dados aceitos na atualização (PUT). `ativo` ausente mantém o valor atual.
#[derive(Deserialize)]
pub struct AtualizaMetodo {
    pub descricao: String,
    pub ativo: Option<bool>,
}

/// Método de pagamento (dinheiro, PIX, cartão...).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MetodoPagamento {
    pub id_metpag: i32,
    pub descricao: String,
    pub ativo: bool,
}

/// Pagamento de uma venda, com a descrição do método.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Pagamento {
    pub id_pag: i32,
    pub vendas_id: i32,
    pub metpag_id: i32,
    pub metodo: String,
    pub valor: BigDecimal,
    pub data_pagamento: NaiveDateTime,
}

/// Formulário de registro de pagamento.
#[derive(Deserialize, Default)]
pub struct PagamentoForm {
    pub metodo: Option<String>,
    pub valor: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct NovoPagamento {
    pub metpag_id: i32,
    pub valor: BigDecimal,
}

impl PagamentoForm {
    pub fn validar(&self) -> Result<NovoPagamento, AppError> {
        let metodo = obrigatorio(self.metodo.as_deref(), "Método de pagamento é obrigatório!")?;
        let metpag_id = parse_inteiro(metodo, "Método de pagamento inválido!")?;
        let valor = valor_positivo(self.valor.as_deref())?;
        Ok(NovoPagamento { metpag_id, valor })
    }
}

/// Situação dos pagamentos de uma venda.
#[derive(Debug, Serialize)]
pub struct SituacaoPagamentos {
    pub venda_id: i32,
    pub valor_venda: BigDecimal,
    pub pagamentos: Vec<Pagamento>,
    pub total_pago: BigDecimal,
    /// Nunca negativo: pagamentos acima do valor não geram saldo.
    pub restante: BigDecimal,
    pub quitada: bool,
}

impl SituacaoPagamentos {
    pub fn calcular(venda_id: i32, valor_venda: BigDecimal, pagamentos: Vec<Pagamento>) -> Self {
        let total_pago = pagamentos
            .iter()
            .fold(BigDecimal::zero(), |soma, p| soma + &p.valor);
        let quitada = total_pago >= valor_venda;
        let restante = if quitada {
            BigDecimal::zero()
        } else {
            &valor_venda - &total_pago
        };

        SituacaoPagamentos { venda_id, valor_venda, pagamentos, total_pago, restante, quitada }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn pagamento(valor: &str) -> Pagamento {
        Pagamento {
            id_pag: 1,
            vendas_id: 9,
            metpag_id: 2,
            metodo: "PIX".to_string(),
            valor: BigDecimal::from_str(valor).unwrap(),
            data_pagamento: chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn pagamento_parcial_deixa_restante() {
        let situacao = SituacaoPagamentos::calcular(
            9,
            BigDecimal::from(100),
            vec![pagamento("30.00"), pagamento("20.50")],
        );
        assert_eq!(situacao.total_pago, BigDecimal::from_str("50.50").unwrap());
        assert_eq!(situacao.restante, BigDecimal::from_str("49.50").unwrap());
        assert!(!situacao.quitada);
    }

    #[test]
    fn pagamento_acima_do_valor_quita_sem_saldo_negativo() {
        let situacao = SituacaoPagamentos::calcular(9, BigDecimal::from(10), vec![pagamento("12")]);
        assert!(situacao.quitada);
        assert_eq!(situacao.restante, BigDecimal::zero());
    }

    #[test]
    fn venda_sem_pagamentos() {
        let situacao = SituacaoPagamentos::calcular(9, BigDecimal::from(10), Vec::new());
        assert_eq!(situacao.total_pago, BigDecimal::zero());
        assert!(!situacao.quitada);
    }

    #[test]
    fn formulario_exige_metodo_numerico() {
        let sem_metodo = PagamentoForm { valor: Some("10".into()), ..Default::default() };
        assert_eq!(
            sem_metodo.validar().unwrap_err().mensagem_usuario(),
            "Método de pagamento é obrigatório!"
        );

        let invalido = PagamentoForm { metodo: Some("pix".into()), valor: Some("10".into()) };
        assert_eq!(invalido.validar().unwrap_err().mensagem_usuario(), "Método de pagamento inválido!");

        let ok = PagamentoForm { metodo: Some("2".into()), valor: Some("15,5".into()) };
        assert_eq!(
            ok.validar().unwrap(),
            NovoPagamento { metpag_id: 2, valor: BigDecimal::from_str("15.50").unwrap() }
        );
    }
}
