// src/vendas/vendas_structs.rs

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::erro::AppError;
use crate::shared::formulario::{obrigatorio, parse_inteiro, texto_preenchido, valor_positivo};

/// Nota fiscal vinculada a uma venda (no máximo uma por venda).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NotaFiscal {
    pub id_nota_fiscal: i32,
    pub numero: String,
    pub data_emissao: NaiveDateTime,
    pub valor: BigDecimal,
}

/// Nota fiscal com o vínculo de venda, usada na listagem de notas do usuário.
#[derive(Debug, Serialize, FromRow)]
pub struct NotaFiscalDetalhe {
    pub id_nota_fiscal: i32,
    pub numero: String,
    pub data_emissao: NaiveDateTime,
    pub valor: BigDecimal,
    pub vendas_id: i32,
}

/// Categoria resumida exibida junto da venda.
#[derive(Debug, Clone, Serialize)]
pub struct CategoriaVenda {
    pub id: i32,
    pub nome: String,
}

/// Venda já montada com a categoria e a nota fiscal ativa, se houver.
#[derive(Debug, Clone, Serialize)]
pub struct Venda {
    pub id: i32,
    pub data_venda: NaiveDateTime,
    pub valor: BigDecimal,
    pub nota_fiscal_emitida: bool,
    pub descricao: String,
    pub categoria: CategoriaVenda,
    pub usuario_id: i32,
    pub nota_fiscal: Option<NotaFiscal>,
}

/// Linha do SELECT de vendas com JOIN em categoria e LEFT JOIN em nota_fiscal.
#[derive(FromRow)]
pub struct VendaLinha {
    pub id_vendas: i32,
    pub data_vendas: NaiveDateTime,
    pub valor: BigDecimal,
    pub nota_fiscal_emitida: bool,
    pub descricao: String,
    pub categoria_id: i32,
    pub nome_categoria: String,
    pub usuario_id: i32,
    pub id_nota_fiscal: Option<i32>,
    pub numero: Option<String>,
    pub data_emissao: Option<NaiveDateTime>,
    pub nf_valor: Option<BigDecimal>,
}

impl From<VendaLinha> for Venda {
    fn from(l: VendaLinha) -> Self {
        let nota_fiscal = match (l.id_nota_fiscal, l.numero, l.data_emissao, l.nf_valor) {
            (Some(id_nota_fiscal), Some(numero), Some(data_emissao), Some(valor)) => Some(NotaFiscal {
                id_nota_fiscal,
                numero,
                data_emissao,
                valor,
            }),
            _ => None,
        };

        Venda {
            id: l.id_vendas,
            data_venda: l.data_vendas,
            valor: l.valor,
            nota_fiscal_emitida: l.nota_fiscal_emitida,
            descricao: l.descricao,
            categoria: CategoriaVenda { id: l.categoria_id, nome: l.nome_categoria },
            usuario_id: l.usuario_id,
            nota_fiscal,
        }
    }
}

/// Formulário de cadastro/edição de venda (também usado pelo painel).
#[derive(Deserialize, Default, Clone)]
pub struct VendaForm {
    pub acao: Option<String>,
    pub id: Option<String>,
    pub categoria: Option<String>,
    pub valor: Option<String>,
    pub descricao: Option<String>,
    #[serde(rename = "emitirNF")]
    pub emitir_nf: Option<String>,
    #[serde(rename = "numeroNF")]
    pub numero_nf: Option<String>,
}

/// Venda validada, pronta para o repositório.
#[derive(Debug, Clone, PartialEq)]
pub struct DadosVenda {
    pub categoria_id: i32,
    pub valor: BigDecimal,
    pub descricao: String,
    /// Número da nota fiscal quando `emitirNF=S`.
    pub numero_nf: Option<String>,
}

impl DadosVenda {
    pub fn emite_nota(&self) -> bool {
        self.numero_nf.is_some()
    }
}

impl VendaForm {
    /// Valida os campos na mesma ordem em que o formulário é conferido:
    /// categoria, valor, número da nota.
    pub fn validar(&self) -> Result<DadosVenda, AppError> {
        let categoria = obrigatorio(self.categoria.as_deref(), "Categoria é obrigatória!")?;
        let valor = valor_positivo(self.valor.as_deref())?;
        let categoria_id = parse_inteiro(categoria, "Categoria inválida!")?;

        let emitir = texto_preenchido(self.emitir_nf.as_deref())
            .map(|v| v.eq_ignore_ascii_case("S"))
            .unwrap_or(false);
        let numero_nf = if emitir {
            let numero = obrigatorio(self.numero_nf.as_deref(), "Número da Nota Fiscal é obrigatório!")?;
            Some(numero.to_string())
        } else {
            None
        };

        Ok(DadosVenda {
            categoria_id,
            valor,
            descricao: self.descricao.as_deref().map(str::trim).unwrap_or_default().to_string(),
            numero_nf,
        })
    }
}

/// Filtro de nota fiscal do histórico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FiltroNf {
    #[serde(rename = "todas")]
    Todas,
    #[serde(rename = "comNF")]
    ComNf,
    #[serde(rename = "semNF")]
    SemNf,
}

impl FiltroNf {
    /// Valores desconhecidos ou ausentes equivalem a `todas`.
    pub fn de(valor: Option<&str>) -> Self {
        match valor {
            Some("comNF") => FiltroNf::ComNf,
            Some("semNF") => FiltroNf::SemNf,
            _ => FiltroNf::Todas,
        }
    }

    /// Valor a comparar com `nota_fiscal_emitida`; `None` não filtra.
    pub fn flag(self) -> Option<bool> {
        match self {
            FiltroNf::Todas => None,
            FiltroNf::ComNf => Some(true),
            FiltroNf::SemNf => Some(false),
        }
    }
}

/// Quantidade e total de vendas de um mês.
#[derive(Debug, Serialize, FromRow)]
pub struct ResumoMensal {
    pub mes: i32,
    pub quantidade: i64,
    pub total: BigDecimal,
}
