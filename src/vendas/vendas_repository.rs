// src/vendas/vendas_repository.rs

//! Acesso às tabelas `vendas` e `nota_fiscal`.
//!
//! Cadastro e edição gravam a venda e a nota fiscal numa única transação:
//! se qualquer comando falhar, nada é gravado. Todas as consultas ignoram
//! linhas excluídas logicamente e são restritas ao usuário dono da venda.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{query, query_as, query_scalar, PgPool, Postgres, Transaction};

use super::periodo::{agora, intervalo_do_ano, intervalo_do_mes};
use super::vendas_structs::{DadosVenda, FiltroNf, NotaFiscalDetalhe, ResumoMensal, Venda, VendaLinha};
use crate::shared::erro::{traduzir_violacao, AppError};

/// SELECT base das vendas com categoria e nota fiscal ativa.
macro_rules! select_vendas {
    ($($resto:literal),*) => {
        concat!(
            "SELECT v.id_vendas, v.data_vendas, v.valor, v.nota_fiscal_emitida, v.descricao, ",
            "v.categoria_id, c.nome_categoria, v.usuario_id, ",
            "nf.id_nota_fiscal, nf.numero, nf.data_emissao, nf.valor AS nf_valor ",
            "FROM vendas v ",
            "INNER JOIN categoria c ON v.categoria_id = c.id_categoria ",
            "LEFT JOIN nota_fiscal nf ON nf.vendas_id = v.id_vendas AND nf.ativo = TRUE ",
            $($resto),*
        )
    };
}

const NF_DUPLICADA: &str = "Número de Nota Fiscal já cadastrado!";

fn periodo_invalido() -> AppError {
    AppError::validacao("Período inválido!")
}

// ============================================================
// Escrita (transacional)
// ============================================================

/// Registra a venda e, se pedida, a nota fiscal. Devolve o ID da venda.
pub async fn inserir(pool: &PgPool, usuario_id: i32, dados: &DadosVenda) -> Result<i32, AppError> {
    let mut tx = pool.begin().await?;

    match inserir_na_transacao(&mut tx, usuario_id, dados).await {
        Ok(id) => {
            tx.commit().await?;
            tracing::info!(venda_id = id, usuario_id, nota = dados.emite_nota(), "venda inserida");
            Ok(id)
        }
        Err(e) => {
            desfazer(tx, "inserir venda").await;
            Err(e)
        }
    }
}

async fn inserir_na_transacao(
    tx: &mut Transaction<'_, Postgres>,
    usuario_id: i32,
    dados: &DadosVenda,
) -> Result<i32, AppError> {
    garantir_categoria(tx, dados.categoria_id, None).await?;

    let momento = agora();
    let id_venda = query_scalar::<_, i32>(
        "INSERT INTO vendas (data_vendas, valor, nota_fiscal_emitida, categoria_id, usuario_id, descricao) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id_vendas",
    )
    .bind(momento)
    .bind(&dados.valor)
    .bind(dados.emite_nota())
    .bind(dados.categoria_id)
    .bind(usuario_id)
    .bind(&dados.descricao)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| traduzir_violacao(e, "Venda duplicada!", "Categoria inválida!"))?;

    if let Some(numero) = &dados.numero_nf {
        inserir_nota(tx, numero, momento, &dados.valor, id_venda, usuario_id).await?;
    }

    Ok(id_venda)
}

/// Atualiza a venda e sincroniza a nota fiscal:
/// - nota pedida e existente: atualiza número e valor (reativando se estava retirada);
/// - nota pedida e inexistente: insere;
/// - nota não pedida e existente: exclusão lógica.
pub async fn editar(
    pool: &PgPool,
    usuario_id: i32,
    venda_id: i32,
    dados: &DadosVenda,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    match editar_na_transacao(&mut tx, usuario_id, venda_id, dados).await {
        Ok(()) => {
            tx.commit().await?;
            tracing::info!(venda_id, usuario_id, nota = dados.emite_nota(), "venda atualizada");
            Ok(())
        }
        Err(e) => {
            desfazer(tx, "editar venda").await;
            Err(e)
        }
    }
}

async fn editar_na_transacao(
    tx: &mut Transaction<'_, Postgres>,
    usuario_id: i32,
    venda_id: i32,
    dados: &DadosVenda,
) -> Result<(), AppError> {
    // Trava a venda e descobre a categoria atual.
    let categoria_atual = query_scalar::<_, i32>(
        "SELECT categoria_id FROM vendas WHERE id_vendas = $1 AND usuario_id = $2 AND ativo = TRUE FOR UPDATE",
    )
    .bind(venda_id)
    .bind(usuario_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::nao_encontrado("Venda não encontrada!"))?;

    garantir_categoria(tx, dados.categoria_id, Some(categoria_atual)).await?;

    query(
        "UPDATE vendas SET valor = $1, nota_fiscal_emitida = $2, categoria_id = $3, descricao = $4 \
         WHERE id_vendas = $5",
    )
    .bind(&dados.valor)
    .bind(dados.emite_nota())
    .bind(dados.categoria_id)
    .bind(&dados.descricao)
    .bind(venda_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| traduzir_violacao(e, "Venda duplicada!", "Categoria inválida!"))?;

    // Inclui notas retiradas: `vendas_id` é único em nota_fiscal.
    let nota_existente = query_scalar::<_, i32>(
        "SELECT id_nota_fiscal FROM nota_fiscal WHERE vendas_id = $1 FOR UPDATE",
    )
    .bind(venda_id)
    .fetch_optional(&mut **tx)
    .await?;

    match (&dados.numero_nf, nota_existente) {
        (Some(numero), Some(id_nota)) => {
            query("UPDATE nota_fiscal SET numero = $1, valor = $2, ativo = TRUE WHERE id_nota_fiscal = $3")
                .bind(numero)
                .bind(&dados.valor)
                .bind(id_nota)
                .execute(&mut **tx)
                .await
                .map_err(|e| traduzir_violacao(e, NF_DUPLICADA, "Venda inválida!"))?;
        }
        (Some(numero), None) => {
            inserir_nota(tx, numero, agora(), &dados.valor, venda_id, usuario_id).await?;
        }
        (None, Some(id_nota)) => {
            query("UPDATE nota_fiscal SET ativo = FALSE WHERE id_nota_fiscal = $1")
                .bind(id_nota)
                .execute(&mut **tx)
                .await?;
        }
        (None, None) => {}
    }

    Ok(())
}

async fn inserir_nota(
    tx: &mut Transaction<'_, Postgres>,
    numero: &str,
    data_emissao: NaiveDateTime,
    valor: &BigDecimal,
    venda_id: i32,
    usuario_id: i32,
) -> Result<i32, AppError> {
    let id = query_scalar::<_, i32>(
        "INSERT INTO nota_fiscal (numero, data_emissao, valor, vendas_id, usuario_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id_nota_fiscal",
    )
    .bind(numero)
    .bind(data_emissao)
    .bind(valor)
    .bind(venda_id)
    .bind(usuario_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| traduzir_violacao(e, NF_DUPLICADA, "Venda inválida!"))?;
    Ok(id)
}

/// A categoria precisa estar ativa, exceto quando é a que a venda já usa.
async fn garantir_categoria(
    tx: &mut Transaction<'_, Postgres>,
    categoria_id: i32,
    categoria_atual: Option<i32>,
) -> Result<(), AppError> {
    if categoria_atual == Some(categoria_id) {
        return Ok(());
    }
    let ativa = query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM categoria WHERE id_categoria = $1 AND ativo = TRUE)",
    )
    .bind(categoria_id)
    .fetch_one(&mut **tx)
    .await?;
    if !ativa {
        return Err(AppError::validacao("Categoria inválida!"));
    }
    Ok(())
}

pub(crate) async fn desfazer(tx: Transaction<'_, Postgres>, operacao: &str) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(operacao, erro = ?e, "falha no rollback");
    } else {
        tracing::warn!(operacao, "transação desfeita");
    }
}

/// Exclusão lógica. Devolve `false` se a venda não existe ou é de outro usuário.
pub async fn excluir(pool: &PgPool, usuario_id: i32, venda_id: i32) -> Result<bool, AppError> {
    let resultado = query("UPDATE vendas SET ativo = FALSE WHERE id_vendas = $1 AND usuario_id = $2 AND ativo = TRUE")
        .bind(venda_id)
        .bind(usuario_id)
        .execute(pool)
        .await?;
    Ok(resultado.rows_affected() > 0)
}

// ============================================================
// Consultas
// ============================================================

pub async fn buscar(pool: &PgPool, usuario_id: i32, venda_id: i32) -> Result<Option<Venda>, AppError> {
    let linha = query_as::<_, VendaLinha>(select_vendas!(
        "WHERE v.id_vendas = $1 AND v.usuario_id = $2 AND v.ativo = TRUE"
    ))
    .bind(venda_id)
    .bind(usuario_id)
    .fetch_optional(pool)
    .await?;
    Ok(linha.map(Venda::from))
}

/// Últimas `limite` vendas do usuário, da mais recente para a mais antiga.
pub async fn listar_por_usuario(pool: &PgPool, usuario_id: i32, limite: i64) -> Result<Vec<Venda>, AppError> {
    let linhas = query_as::<_, VendaLinha>(select_vendas!(
        "WHERE v.ativo = TRUE AND v.usuario_id = $1 ",
        "ORDER BY v.data_vendas DESC LIMIT $2"
    ))
    .bind(usuario_id)
    .bind(limite)
    .fetch_all(pool)
    .await?;
    Ok(linhas.into_iter().map(Venda::from).collect())
}

/// Vendas no intervalo `[inicio, fim)`, em ordem cronológica.
pub async fn listar_por_periodo(
    pool: &PgPool,
    usuario_id: i32,
    inicio: NaiveDateTime,
    fim: NaiveDateTime,
) -> Result<Vec<Venda>, AppError> {
    let linhas = query_as::<_, VendaLinha>(select_vendas!(
        "WHERE v.ativo = TRUE AND v.usuario_id = $1 ",
        "AND v.data_vendas >= $2 AND v.data_vendas < $3 ",
        "ORDER BY v.data_vendas"
    ))
    .bind(usuario_id)
    .bind(inicio)
    .bind(fim)
    .fetch_all(pool)
    .await?;
    Ok(linhas.into_iter().map(Venda::from).collect())
}

pub async fn listar_por_mes_ano(pool: &PgPool, usuario_id: i32, mes: u32, ano: i32) -> Result<Vec<Venda>, AppError> {
    let (inicio, fim) = intervalo_do_mes(ano, mes).ok_or_else(periodo_invalido)?;
    listar_por_periodo(pool, usuario_id, inicio, fim).await
}

/// Vendas do ano, mais recentes primeiro, com filtro de nota fiscal.
pub async fn listar_por_ano_com_filtro_nf(
    pool: &PgPool,
    usuario_id: i32,
    ano: i32,
    filtro: FiltroNf,
) -> Result<Vec<Venda>, AppError> {
    let (inicio, fim) = intervalo_do_ano(ano).ok_or_else(periodo_invalido)?;
    let linhas = query_as::<_, VendaLinha>(select_vendas!(
        "WHERE v.usuario_id = $1 AND v.ativo = TRUE ",
        "AND v.data_vendas >= $2 AND v.data_vendas < $3 ",
        "AND ($4::BOOLEAN IS NULL OR v.nota_fiscal_emitida = $4) ",
        "ORDER BY v.data_vendas DESC"
    ))
    .bind(usuario_id)
    .bind(inicio)
    .bind(fim)
    .bind(filtro.flag())
    .fetch_all(pool)
    .await?;
    Ok(linhas.into_iter().map(Venda::from).collect())
}

/// Anos em que o usuário tem vendas, do mais recente ao mais antigo.
pub async fn listar_anos_com_vendas(pool: &PgPool, usuario_id: i32) -> Result<Vec<i32>, AppError> {
    let anos = query_scalar::<_, i32>(
        "SELECT DISTINCT EXTRACT(YEAR FROM data_vendas)::INT AS ano FROM vendas \
         WHERE usuario_id = $1 AND ativo = TRUE ORDER BY ano DESC",
    )
    .bind(usuario_id)
    .fetch_all(pool)
    .await?;
    Ok(anos)
}

/// Soma das vendas do mês que contém `hoje`.
pub async fn calcular_total_mes(pool: &PgPool, usuario_id: i32, hoje: NaiveDate) -> Result<BigDecimal, AppError> {
    use chrono::Datelike;

    let (inicio, fim) = intervalo_do_mes(hoje.year(), hoje.month()).ok_or_else(periodo_invalido)?;
    let total = query_scalar::<_, BigDecimal>(
        "SELECT COALESCE(SUM(valor), 0) FROM vendas \
         WHERE usuario_id = $1 AND ativo = TRUE AND data_vendas >= $2 AND data_vendas < $3",
    )
    .bind(usuario_id)
    .bind(inicio)
    .bind(fim)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Quantidade e total por mês do ano (apenas meses com vendas).
pub async fn resumo_mensal(pool: &PgPool, usuario_id: i32, ano: i32) -> Result<Vec<ResumoMensal>, AppError> {
    let (inicio, fim) = intervalo_do_ano(ano).ok_or_else(periodo_invalido)?;
    let resumo = query_as::<_, ResumoMensal>(
        "SELECT EXTRACT(MONTH FROM data_vendas)::INT AS mes, COUNT(*) AS quantidade, SUM(valor) AS total \
         FROM vendas \
         WHERE usuario_id = $1 AND ativo = TRUE AND data_vendas >= $2 AND data_vendas < $3 \
         GROUP BY 1 ORDER BY 1",
    )
    .bind(usuario_id)
    .bind(inicio)
    .bind(fim)
    .fetch_all(pool)
    .await?;
    Ok(resumo)
}

// ============================================================
// Notas fiscais
// ============================================================

pub async fn listar_notas_por_usuario(pool: &PgPool, usuario_id: i32) -> Result<Vec<NotaFiscalDetalhe>, AppError> {
    let notas = query_as::<_, NotaFiscalDetalhe>(
        "SELECT nf.id_nota_fiscal, nf.numero, nf.data_emissao, nf.valor, nf.vendas_id \
         FROM nota_fiscal nf \
         INNER JOIN vendas v ON v.id_vendas = nf.vendas_id \
         WHERE nf.usuario_id = $1 AND nf.ativo = TRUE AND v.ativo = TRUE \
         ORDER BY nf.data_emissao DESC",
    )
    .bind(usuario_id)
    .fetch_all(pool)
    .await?;
    Ok(notas)
}

pub async fn buscar_nota(pool: &PgPool, usuario_id: i32, id_nota: i32) -> Result<Option<NotaFiscalDetalhe>, AppError> {
    let nota = query_as::<_, NotaFiscalDetalhe>(
        "SELECT nf.id_nota_fiscal, nf.numero, nf.data_emissao, nf.valor, nf.vendas_id \
         FROM nota_fiscal nf \
         INNER JOIN vendas v ON v.id_vendas = nf.vendas_id \
         WHERE nf.id_nota_fiscal = $1 AND nf.usuario_id = $2 AND nf.ativo = TRUE AND v.ativo = TRUE",
    )
    .bind(id_nota)
    .bind(usuario_id)
    .fetch_optional(pool)
    .await?;
    Ok(nota)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::teste_util::{criar_usuario, dados_venda, id_da_categoria};
    use crate::vendas::periodo::ano_atual;

    const SERVICOS: &str = "Prestação de Serviços";

    async fn vendas_do_usuario(pool: &PgPool, usuario_id: i32) -> i64 {
        query_scalar::<_, i64>("SELECT COUNT(*) FROM vendas WHERE usuario_id = $1")
            .bind(usuario_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn nota_duplicada_desfaz_a_venda(pool: PgPool) {
        let usuario = criar_usuario(&pool, "11111111111").await;
        let categoria = id_da_categoria(&pool, SERVICOS).await;

        inserir(&pool, usuario, &dados_venda(categoria, "100.00", Some("NF-1"))).await.unwrap();
        let erro = inserir(&pool, usuario, &dados_venda(categoria, "50.00", Some("NF-1")))
            .await
            .unwrap_err();

        assert!(matches!(erro, AppError::Conflito(_)));
        assert_eq!(erro.mensagem_usuario(), NF_DUPLICADA);
        assert_eq!(vendas_do_usuario(&pool, usuario).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn categoria_inativa_e_recusada(pool: PgPool) {
        let usuario = criar_usuario(&pool, "11111111111").await;
        let categoria = id_da_categoria(&pool, SERVICOS).await;
        query("UPDATE categoria SET ativo = FALSE WHERE id_categoria = $1")
            .bind(categoria)
            .execute(&pool)
            .await
            .unwrap();

        let erro = inserir(&pool, usuario, &dados_venda(categoria, "10.00", None)).await.unwrap_err();
        assert_eq!(erro.mensagem_usuario(), "Categoria inválida!");
        assert_eq!(vendas_do_usuario(&pool, usuario).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn desmarcar_e_remarcar_nota_reaproveita_a_linha(pool: PgPool) {
        let usuario = criar_usuario(&pool, "11111111111").await;
        let categoria = id_da_categoria(&pool, SERVICOS).await;
        let id = inserir(&pool, usuario, &dados_venda(categoria, "80.00", Some("NF-10"))).await.unwrap();

        editar(&pool, usuario, id, &dados_venda(categoria, "80.00", None)).await.unwrap();
        let venda = buscar(&pool, usuario, id).await.unwrap().unwrap();
        assert!(!venda.nota_fiscal_emitida);
        assert!(venda.nota_fiscal.is_none());
        let ativa = query_scalar::<_, bool>("SELECT ativo FROM nota_fiscal WHERE vendas_id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(!ativa);

        editar(&pool, usuario, id, &dados_venda(categoria, "90.00", Some("NF-11"))).await.unwrap();
        let venda = buscar(&pool, usuario, id).await.unwrap().unwrap();
        let nota = venda.nota_fiscal.unwrap();
        assert_eq!(nota.numero, "NF-11");
        assert_eq!(nota.valor, venda.valor);
        let notas = query_scalar::<_, i64>("SELECT COUNT(*) FROM nota_fiscal WHERE vendas_id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(notas, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn venda_de_outro_usuario_fica_intocada(pool: PgPool) {
        let dono = criar_usuario(&pool, "11111111111").await;
        let outro = criar_usuario(&pool, "22222222222").await;
        let categoria = id_da_categoria(&pool, SERVICOS).await;
        let id = inserir(&pool, dono, &dados_venda(categoria, "30.00", None)).await.unwrap();

        assert!(buscar(&pool, outro, id).await.unwrap().is_none());
        assert!(!excluir(&pool, outro, id).await.unwrap());
        let erro = editar(&pool, outro, id, &dados_venda(categoria, "1.00", None)).await.unwrap_err();
        assert_eq!(erro.mensagem_usuario(), "Venda não encontrada!");

        assert!(excluir(&pool, dono, id).await.unwrap());
        assert!(buscar(&pool, dono, id).await.unwrap().is_none());
        assert!(!excluir(&pool, dono, id).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn filtro_de_nota_no_ano(pool: PgPool) {
        let usuario = criar_usuario(&pool, "11111111111").await;
        let categoria = id_da_categoria(&pool, SERVICOS).await;
        inserir(&pool, usuario, &dados_venda(categoria, "10.00", Some("NF-A"))).await.unwrap();
        inserir(&pool, usuario, &dados_venda(categoria, "20.00", None)).await.unwrap();
        inserir(&pool, usuario, &dados_venda(categoria, "30.00", None)).await.unwrap();

        let ano = ano_atual();
        for (filtro, esperado) in [(FiltroNf::Todas, 3), (FiltroNf::ComNf, 1), (FiltroNf::SemNf, 2)] {
            let vendas = listar_por_ano_com_filtro_nf(&pool, usuario, ano, filtro).await.unwrap();
            assert_eq!(vendas.len(), esperado, "{:?}", filtro);
            assert!(vendas.iter().all(|v| filtro.flag().map_or(true, |nf| v.nota_fiscal_emitida == nf)));
        }
        assert!(listar_por_ano_com_filtro_nf(&pool, usuario, ano - 1, FiltroNf::Todas)
            .await
            .unwrap()
            .is_empty());
    }
}
