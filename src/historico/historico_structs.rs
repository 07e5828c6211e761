// src/historico/historico_structs.rs

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::vendas::periodo::ano_no_calendario;
use crate::vendas::vendas_structs::{FiltroNf, Venda};

/// Filtros do histórico, vindos da URL ou do formulário.
#[derive(Deserialize, Default, Clone)]
pub struct FiltroHistorico {
    pub ano: Option<String>,
    #[serde(rename = "filtroNF")]
    pub filtro_nf: Option<String>,
}

impl FiltroHistorico {
    /// Campos preenchidos em `outro` prevalecem.
    pub fn mesclar(self, outro: FiltroHistorico) -> Self {
        FiltroHistorico {
            ano: outro.ano.or(self.ano),
            filtro_nf: outro.filtro_nf.or(self.filtro_nf),
        }
    }

    /// Ano pedido; ausente, ilegível ou fora do calendário vira `padrao`.
    pub fn ano_ou(&self, padrao: i32) -> i32 {
        self.ano
            .as_deref()
            .and_then(ano_no_calendario)
            .unwrap_or(padrao)
    }

    pub fn filtro(&self) -> FiltroNf {
        FiltroNf::de(self.filtro_nf.as_deref())
    }
}

/// Anos oferecidos no seletor. Sem vendas, mostra os três últimos anos.
pub fn anos_disponiveis(anos_com_vendas: Vec<i32>, ano_atual: i32) -> Vec<i32> {
    if anos_com_vendas.is_empty() {
        vec![ano_atual, ano_atual - 1, ano_atual - 2]
    } else {
        anos_com_vendas
    }
}

/// Totais exibidos no rodapé do histórico.
#[derive(Debug, Serialize, PartialEq)]
pub struct ResumoHistorico {
    pub total_vendas: usize,
    pub total_valor: BigDecimal,
    pub total_com_nf: usize,
    pub total_sem_nf: usize,
    pub valor_com_nf: BigDecimal,
    pub valor_sem_nf: BigDecimal,
}

impl ResumoHistorico {
    pub fn calcular(vendas: &[Venda]) -> Self {
        let mut resumo = ResumoHistorico {
            total_vendas: vendas.len(),
            total_valor: BigDecimal::zero(),
            total_com_nf: 0,
            total_sem_nf: 0,
            valor_com_nf: BigDecimal::zero(),
            valor_sem_nf: BigDecimal::zero(),
        };

        for venda in vendas {
            resumo.total_valor += &venda.valor;
            if venda.nota_fiscal_emitida {
                resumo.total_com_nf += 1;
                resumo.valor_com_nf += &venda.valor;
            } else {
                resumo.total_sem_nf += 1;
                resumo.valor_sem_nf += &venda.valor;
            }
        }
        resumo
    }
}

#[derive(Serialize)]
pub struct PaginaHistorico {
    pub ano: i32,
    pub filtro_nf: FiltroNf,
    pub anos: Vec<i32>,
    pub vendas: Vec<Venda>,
    pub resumo: ResumoHistorico,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendas::vendas_structs::CategoriaVenda;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn venda(valor: &str, com_nf: bool) -> Venda {
        Venda {
            id: 1,
            data_venda: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap().and_hms_opt(14, 0, 0).unwrap(),
            valor: BigDecimal::from_str(valor).unwrap(),
            nota_fiscal_emitida: com_nf,
            descricao: String::new(),
            categoria: CategoriaVenda { id: 1, nome: "Prestação de Serviços".into() },
            usuario_id: 7,
            nota_fiscal: None,
        }
    }

    #[test]
    fn totais_separados_por_nota() {
        let vendas = vec![venda("100.00", true), venda("50.25", false), venda("10", false)];
        let resumo = ResumoHistorico::calcular(&vendas);

        assert_eq!(resumo.total_vendas, 3);
        assert_eq!(resumo.total_valor, BigDecimal::from_str("160.25").unwrap());
        assert_eq!(resumo.total_com_nf, 1);
        assert_eq!(resumo.total_sem_nf, 2);
        assert_eq!(resumo.valor_com_nf, BigDecimal::from(100));
        assert_eq!(resumo.valor_sem_nf, BigDecimal::from_str("60.25").unwrap());
    }

    #[test]
    fn historico_vazio_zera_totais() {
        let resumo = ResumoHistorico::calcular(&[]);
        assert_eq!(resumo.total_vendas, 0);
        assert_eq!(resumo.total_valor, BigDecimal::zero());
    }

    #[test]
    fn ano_ilegivel_usa_o_padrao() {
        let filtro = FiltroHistorico { ano: Some("dois mil".into()), filtro_nf: None };
        assert_eq!(filtro.ano_ou(2026), 2026);
        let filtro = FiltroHistorico { ano: Some("999999".into()), filtro_nf: None };
        assert_eq!(filtro.ano_ou(2026), 2026);
        let filtro = FiltroHistorico { ano: Some("2024".into()), filtro_nf: Some("semNF".into()) };
        assert_eq!(filtro.ano_ou(2026), 2024);
        assert_eq!(filtro.filtro(), FiltroNf::SemNf);
    }

    #[test]
    fn formulario_prevalece_sobre_a_url() {
        let url = FiltroHistorico { ano: Some("2023".into()), filtro_nf: Some("comNF".into()) };
        let form = FiltroHistorico { ano: Some("2025".into()), filtro_nf: None };
        let filtro = url.mesclar(form);
        assert_eq!(filtro.ano_ou(0), 2025);
        assert_eq!(filtro.filtro(), FiltroNf::ComNf);
    }

    #[test]
    fn sem_vendas_oferece_ultimos_tres_anos() {
        assert_eq!(anos_disponiveis(vec![], 2026), vec![2026, 2025, 2024]);
        assert_eq!(anos_disponiveis(vec![2025], 2026), vec![2025]);
    }
}
