// src/relatorio/relatorio_structs.rs

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::erro::AppError;
use crate::shared::formulario::texto_preenchido;
use crate::vendas::periodo::ano_no_calendario;
use crate::vendas::vendas_structs::{ResumoMensal, Venda};

/// Classes de receita bruta do relatório mensal do MEI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClasseReceita {
    Revenda,
    Industrializados,
    Servicos,
}

impl ClasseReceita {
    pub const TODAS: [ClasseReceita; 3] =
        [ClasseReceita::Revenda, ClasseReceita::Industrializados, ClasseReceita::Servicos];

    /// Classifica pelo nome da categoria, sem diferenciar maiúsculas.
    /// Categorias que não se encaixam ficam fora dos totais do MEI.
    pub fn classificar(nome_categoria: &str) -> Option<Self> {
        let nome = nome_categoria.to_lowercase();
        if nome.contains("revenda") || nome.contains("mercadoria") {
            Some(ClasseReceita::Revenda)
        } else if nome.contains("industrial") || nome.contains("produto") {
            Some(ClasseReceita::Industrializados)
        } else if nome.contains("servi") {
            Some(ClasseReceita::Servicos)
        } else {
            None
        }
    }

    pub fn rotulo(self) -> &'static str {
        match self {
            ClasseReceita::Revenda => "I - Revenda de Mercadorias",
            ClasseReceita::Industrializados => "II - Produtos Industrializados",
            ClasseReceita::Servicos => "III - Prestação de Serviços",
        }
    }
}

/// Receita de uma classe, separada por emissão de nota fiscal.
#[derive(Debug, Clone, PartialEq)]
pub struct LinhaReceita {
    pub com_nf: BigDecimal,
    pub sem_nf: BigDecimal,
}

impl Default for LinhaReceita {
    fn default() -> Self {
        LinhaReceita { com_nf: BigDecimal::zero(), sem_nf: BigDecimal::zero() }
    }
}

impl LinhaReceita {
    pub fn total(&self) -> BigDecimal {
        &self.com_nf + &self.sem_nf
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct TotaisRelatorio {
    pub revenda: LinhaReceita,
    pub industrializados: LinhaReceita,
    pub servicos: LinhaReceita,
}

impl TotaisRelatorio {
    pub fn calcular(vendas: &[Venda]) -> Self {
        let mut totais = TotaisRelatorio::default();
        for venda in vendas {
            let classe = match ClasseReceita::classificar(&venda.categoria.nome) {
                Some(c) => c,
                None => continue,
            };
            let linha = totais.linha_mut(classe);
            if venda.nota_fiscal_emitida {
                linha.com_nf += &venda.valor;
            } else {
                linha.sem_nf += &venda.valor;
            }
        }
        totais
    }

    pub fn linha(&self, classe: ClasseReceita) -> &LinhaReceita {
        match classe {
            ClasseReceita::Revenda => &self.revenda,
            ClasseReceita::Industrializados => &self.industrializados,
            ClasseReceita::Servicos => &self.servicos,
        }
    }

    fn linha_mut(&mut self, classe: ClasseReceita) -> &mut LinhaReceita {
        match classe {
            ClasseReceita::Revenda => &mut self.revenda,
            ClasseReceita::Industrializados => &mut self.industrializados,
            ClasseReceita::Servicos => &mut self.servicos,
        }
    }

    pub fn total_com_nf(&self) -> BigDecimal {
        ClasseReceita::TODAS
            .iter()
            .fold(BigDecimal::zero(), |soma, c| soma + &self.linha(*c).com_nf)
    }

    pub fn total_sem_nf(&self) -> BigDecimal {
        ClasseReceita::TODAS
            .iter()
            .fold(BigDecimal::zero(), |soma, c| soma + &self.linha(*c).sem_nf)
    }

    /// Soma das seis células da tabela.
    pub fn total_geral(&self) -> BigDecimal {
        self.total_com_nf() + self.total_sem_nf()
    }
}

/// Formulário de geração do PDF.
#[derive(Deserialize, Default)]
pub struct RelatorioForm {
    pub mes: Option<String>,
    pub ano: Option<String>,
}

impl RelatorioForm {
    /// Devolve `(mes, ano)` validados.
    pub fn validar(&self) -> Result<(u32, i32), AppError> {
        let (mes, ano) = match (texto_preenchido(self.mes.as_deref()), texto_preenchido(self.ano.as_deref())) {
            (Some(m), Some(a)) => (m, a),
            _ => return Err(AppError::validacao("Mês e ano são obrigatórios!")),
        };
        let (mes, ano) = match (mes.parse::<u32>(), ano_no_calendario(ano)) {
            (Ok(m), Some(a)) => (m, a),
            _ => return Err(AppError::validacao("Mês ou ano inválido!")),
        };
        if !(1..=12).contains(&mes) {
            return Err(AppError::validacao("Mês deve estar entre 1 e 12!"));
        }
        Ok((mes, ano))
    }
}

#[derive(Deserialize, Default)]
pub struct RelatorioQuery {
    pub ano: Option<String>,
}

#[derive(Serialize)]
pub struct PaginaRelatorio {
    pub ano: i32,
    pub anos: Vec<i32>,
    pub resumo_mensal: Vec<ResumoMensal>,
}

/// Tudo o que o PDF precisa, já carregado do banco.
pub struct DadosRelatorio {
    pub nome: String,
    pub cpf: String,
    pub mes: u32,
    pub ano: i32,
    pub vendas: Vec<Venda>,
    pub totais: TotaisRelatorio,
    pub emitido_em: NaiveDate,
}

impl DadosRelatorio {
    pub fn nome_arquivo(&self) -> String {
        format!("relatorio_mei_{}_{}.pdf", self.mes, self.ano)
    }
}
