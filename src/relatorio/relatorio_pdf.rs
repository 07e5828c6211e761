// src/relatorio/relatorio_pdf.rs

//! Geração do PDF do Relatório Mensal de Receitas Brutas.
//!
//! O documento é um fluxo de texto em A4 com a fonte Helvetica embutida no
//! leitor de PDF; uma nova página é aberta quando a atual enche.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::relatorio_structs::{ClasseReceita, DadosRelatorio};
use crate::shared::erro::AppError;
use crate::shared::formato::{formatar_cpf, formatar_data, formatar_moeda, nome_mes};

const LARGURA: f32 = 210.0;
const ALTURA: f32 = 297.0;
const MARGEM: f32 = 20.0;
const NOME_CAMADA: &str = "Camada 1";

fn erro_pdf(e: impl std::fmt::Debug) -> AppError {
    AppError::Pdf(format!("{:?}", e))
}

/// Corta textos longos para caberem na coluna.
fn caber(texto: &str, limite: usize) -> String {
    if texto.chars().count() <= limite {
        return texto.to_string();
    }
    let mut cortado: String = texto.chars().take(limite.saturating_sub(3)).collect();
    cortado.push_str("...");
    cortado
}

/// Escreve linhas de cima para baixo, abrindo páginas quando necessário.
struct Escritor {
    doc: PdfDocumentReference,
    camada: PdfLayerReference,
    normal: IndirectFontRef,
    negrito: IndirectFontRef,
    y: f32,
}

impl Escritor {
    fn novo(titulo: &str) -> Result<Self, AppError> {
        let (doc, pagina, camada) = PdfDocument::new(titulo, Mm(LARGURA), Mm(ALTURA), NOME_CAMADA);
        let normal = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(erro_pdf)?;
        let negrito = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(erro_pdf)?;
        let camada = doc.get_page(pagina).get_layer(camada);
        Ok(Escritor { doc, camada, normal, negrito, y: ALTURA - MARGEM })
    }

    fn garantir_espaco(&mut self, altura: f32) {
        if self.y - altura < MARGEM {
            let (pagina, camada) = self.doc.add_page(Mm(LARGURA), Mm(ALTURA), NOME_CAMADA);
            self.camada = self.doc.get_page(pagina).get_layer(camada);
            self.y = ALTURA - MARGEM;
        }
    }

    /// Uma linha com uma ou mais colunas `(x em mm, texto)`.
    fn linha(&mut self, colunas: &[(f32, &str)], tamanho: f32, negrito: bool) {
        let altura = tamanho * 0.5 + 2.0;
        self.garantir_espaco(altura);
        self.y -= altura;
        let fonte = if negrito { &self.negrito } else { &self.normal };
        for (x, texto) in colunas {
            self.camada.use_text(*texto, tamanho, Mm(*x), Mm(self.y), fonte);
        }
    }

    fn espaco(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn finalizar(self) -> Result<Vec<u8>, AppError> {
        self.doc.save_to_bytes().map_err(erro_pdf)
    }
}

/// Monta o relatório completo e devolve os bytes do PDF.
pub fn gerar(dados: &DadosRelatorio) -> Result<Vec<u8>, AppError> {
    let mut pdf = Escritor::novo("Relatório Mensal de Receitas Brutas")?;

    pdf.linha(&[(MARGEM, "RELATÓRIO MENSAL DE RECEITAS BRUTAS")], 16.0, true);
    pdf.espaco(2.0);
    pdf.linha(&[(MARGEM, "MICROEMPREENDEDOR INDIVIDUAL (MEI)")], 12.0, true);
    pdf.espaco(4.0);

    let cpf = formatar_cpf(&dados.cpf);
    let periodo = format!("{}/{}", nome_mes(dados.mes).unwrap_or("?"), dados.ano);
    pdf.linha(&[(MARGEM, "Nome:"), (MARGEM + 25.0, &dados.nome)], 10.0, false);
    pdf.linha(&[(MARGEM, "CPF:"), (MARGEM + 25.0, &cpf)], 10.0, false);
    pdf.linha(&[(MARGEM, "Período:"), (MARGEM + 25.0, &periodo)], 10.0, false);
    pdf.espaco(6.0);

    escrever_receitas(&mut pdf, dados);
    pdf.espaco(6.0);
    escrever_detalhes(&mut pdf, dados);

    pdf.espaco(10.0);
    pdf.linha(
        &[(
            MARGEM,
            "Relatório gerado automaticamente pelo Sistema MEI - Conforme exigências da Receita Federal do Brasil",
        )],
        8.0,
        false,
    );
    let emitido = format!("Emitido em: {}", dados.emitido_em.format("%d/%m/%Y"));
    pdf.linha(&[(MARGEM, &emitido)], 8.0, false);

    pdf.finalizar()
}

fn escrever_receitas(pdf: &mut Escritor, dados: &DadosRelatorio) {
    const COL_COM: f32 = 100.0;
    const COL_SEM: f32 = 135.0;
    const COL_TOTAL: f32 = 170.0;

    pdf.linha(&[(MARGEM, "RECEITAS DO MÊS")], 12.0, true);
    pdf.espaco(2.0);
    pdf.linha(
        &[(MARGEM, "CATEGORIA"), (COL_COM, "COM NF"), (COL_SEM, "SEM NF"), (COL_TOTAL, "TOTAL")],
        10.0,
        true,
    );

    for classe in ClasseReceita::TODAS {
        let linha = dados.totais.linha(classe);
        let com = formatar_moeda(&linha.com_nf);
        let sem = formatar_moeda(&linha.sem_nf);
        let total = formatar_moeda(&linha.total());
        pdf.linha(
            &[(MARGEM, classe.rotulo()), (COL_COM, &com), (COL_SEM, &sem), (COL_TOTAL, &total)],
            10.0,
            false,
        );
    }

    let com = formatar_moeda(&dados.totais.total_com_nf());
    let sem = formatar_moeda(&dados.totais.total_sem_nf());
    pdf.linha(&[(MARGEM, "Subtotais"), (COL_COM, &com), (COL_SEM, &sem)], 10.0, false);
    let geral = formatar_moeda(&dados.totais.total_geral());
    pdf.linha(&[(MARGEM, "TOTAL GERAL"), (COL_TOTAL, &geral)], 10.0, true);
}

fn escrever_detalhes(pdf: &mut Escritor, dados: &DadosRelatorio) {
    const COL_CATEGORIA: f32 = 45.0;
    const COL_DESCRICAO: f32 = 95.0;
    const COL_NF: f32 = 150.0;
    const COL_VALOR: f32 = 162.0;

    pdf.linha(&[(MARGEM, "DETALHAMENTO DAS VENDAS")], 12.0, true);
    pdf.espaco(2.0);
    pdf.linha(
        &[
            (MARGEM, "Data"),
            (COL_CATEGORIA, "Categoria"),
            (COL_DESCRICAO, "Descrição"),
            (COL_NF, "NF"),
            (COL_VALOR, "Valor"),
        ],
        9.0,
        true,
    );

    for venda in &dados.vendas {
        let data = formatar_data(&venda.data_venda);
        let categoria = caber(&venda.categoria.nome, 26);
        let descricao = if venda.descricao.trim().is_empty() {
            "-".to_string()
        } else {
            caber(&venda.descricao, 30)
        };
        let nf = if venda.nota_fiscal_emitida { "S" } else { "N" };
        let valor = formatar_moeda(&venda.valor);

        pdf.linha(
            &[
                (MARGEM, &data),
                (COL_CATEGORIA, &categoria),
                (COL_DESCRICAO, &descricao),
                (COL_NF, nf),
                (COL_VALOR, &valor),
            ],
            9.0,
            false,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relatorio::relatorio_structs::TotaisRelatorio;
    use crate::vendas::vendas_structs::{CategoriaVenda, Venda};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn dados(quantidade: usize) -> DadosRelatorio {
        let vendas: Vec<Venda> = (0..quantidade)
            .map(|i| Venda {
                id: i as i32,
                data_venda: NaiveDate::from_ymd_opt(2025, 3, 1 + (i % 28) as u32)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
                valor: BigDecimal::from(10 + i as i64),
                nota_fiscal_emitida: i % 2 == 0,
                descricao: if i % 3 == 0 { String::new() } else { "Conserto de notebook".into() },
                categoria: CategoriaVenda { id: 3, nome: "Prestação de Serviços".into() },
                usuario_id: 7,
                nota_fiscal: None,
            })
            .collect();
        let totais = TotaisRelatorio::calcular(&vendas);
        DadosRelatorio {
            nome: "Maria da Silva".into(),
            cpf: "12345678909".into(),
            mes: 3,
            ano: 2025,
            vendas,
            totais,
            emitido_em: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        }
    }

    #[test]
    fn gera_pdf_valido() {
        let bytes = gerar(&dados(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn muitas_vendas_quebram_pagina() {
        let uma_pagina = gerar(&dados(2)).unwrap();
        let varias = gerar(&dados(150)).unwrap();
        assert!(varias.starts_with(b"%PDF"));
        assert!(varias.len() > uma_pagina.len());
    }

    #[test]
    fn texto_longo_e_cortado() {
        assert_eq!(caber("curto", 10), "curto");
        assert_eq!(caber("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn nome_do_arquivo() {
        assert_eq!(dados(0).nome_arquivo(), "relatorio_mei_3_2025.pdf");
    }
}
