// src/pagamentos/pagamento_repository.rs

use bigdecimal::BigDecimal;
use sqlx::{query, query_as, query_scalar, PgPool, Postgres, Transaction};

use super::pagamento_structs::{MetodoPagamento, NovoPagamento, Pagamento};
use crate::shared::erro::{traduzir_violacao, AppError};
use crate::vendas::periodo::agora;
use crate::vendas::vendas_repository::desfazer;

// ============================================================
// Métodos de pagamento
// ============================================================

pub async fn listar_metodos(pool: &PgPool) -> Result<Vec<MetodoPagamento>, AppError> {
    let metodos = query_as::<_, MetodoPagamento>(
        "SELECT id_metpag, descricao, ativo FROM metodo_pagamento WHERE ativo = TRUE ORDER BY descricao",
    )
    .fetch_all(pool)
    .await?;
    Ok(metodos)
}

pub async fn buscar_metodo(pool: &PgPool, id: i32) -> Result<Option<MetodoPagamento>, AppError> {
    let metodo = query_as::<_, MetodoPagamento>(
        "SELECT id_metpag, descricao, ativo FROM metodo_pagamento WHERE id_metpag = $1 AND ativo = TRUE",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(metodo)
}

pub async fn inserir_metodo(pool: &PgPool, descricao: &str) -> Result<i32, AppError> {
    let id = query_scalar::<_, i32>(
        "INSERT INTO metodo_pagamento (descricao, ativo) VALUES ($1, TRUE) RETURNING id_metpag",
    )
    .bind(descricao)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Devolve `false` se o método não existe.
pub async fn atualizar_metodo(
    pool: &PgPool,
    id: i32,
    descricao: &str,
    ativo: Option<bool>,
) -> Result<bool, AppError> {
    let resultado = query(
        "UPDATE metodo_pagamento SET descricao = $1, ativo = COALESCE($2, ativo) WHERE id_metpag = $3",
    )
    .bind(descricao)
    .bind(ativo)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(resultado.rows_affected() > 0)
}

pub async fn excluir_metodo(pool: &PgPool, id: i32) -> Result<bool, AppError> {
    let resultado = query("UPDATE metodo_pagamento SET ativo = FALSE WHERE id_metpag = $1 AND ativo = TRUE")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(resultado.rows_affected() > 0)
}

// ============================================================
// Pagamentos
// ============================================================

/// Valor da venda ativa do usuário, ou `None` se ela não lhe pertence.
pub async fn valor_da_venda(pool: &PgPool, usuario_id: i32, venda_id: i32) -> Result<Option<BigDecimal>, AppError> {
    let valor = query_scalar::<_, BigDecimal>(
        "SELECT valor FROM vendas WHERE id_vendas = $1 AND usuario_id = $2 AND ativo = TRUE",
    )
    .bind(venda_id)
    .bind(usuario_id)
    .fetch_optional(pool)
    .await?;
    Ok(valor)
}

pub async fn listar_por_venda(pool: &PgPool, venda_id: i32) -> Result<Vec<Pagamento>, AppError> {
    let pagamentos = query_as::<_, Pagamento>(
        "SELECT p.id_pag, p.vendas_id, p.metpag_id, m.descricao AS metodo, p.valor, p.data_pagamento \
         FROM pagamento p \
         INNER JOIN metodo_pagamento m ON p.metpag_id = m.id_metpag \
         WHERE p.ativo = TRUE AND p.vendas_id = $1 \
         ORDER BY p.data_pagamento",
    )
    .bind(venda_id)
    .fetch_all(pool)
    .await?;
    Ok(pagamentos)
}

/// Registra um pagamento numa venda do usuário com um método ativo.
///
/// A venda fica travada até o commit, então uma exclusão concorrente
/// não deixa o pagamento apontando para venda inativa.
pub async fn inserir(
    pool: &PgPool,
    usuario_id: i32,
    venda_id: i32,
    novo: &NovoPagamento,
) -> Result<i32, AppError> {
    let mut tx = pool.begin().await?;
    match inserir_na_transacao(&mut tx, usuario_id, venda_id, novo).await {
        Ok(id) => {
            tx.commit().await?;
            tracing::info!(pagamento_id = id, venda_id, usuario_id, "pagamento registrado");
            Ok(id)
        }
        Err(e) => {
            desfazer(tx, "registrar pagamento").await;
            Err(e)
        }
    }
}

async fn inserir_na_transacao(
    tx: &mut Transaction<'_, Postgres>,
    usuario_id: i32,
    venda_id: i32,
    novo: &NovoPagamento,
) -> Result<i32, AppError> {
    let venda = query_scalar::<_, i32>(
        "SELECT id_vendas FROM vendas WHERE id_vendas = $1 AND usuario_id = $2 AND ativo = TRUE FOR UPDATE",
    )
    .bind(venda_id)
    .bind(usuario_id)
    .fetch_optional(&mut **tx)
    .await?;
    if venda.is_none() {
        return Err(AppError::nao_encontrado("Venda não encontrada!"));
    }

    let metodo = query_scalar::<_, i32>(
        "SELECT id_metpag FROM metodo_pagamento WHERE id_metpag = $1 AND ativo = TRUE FOR SHARE",
    )
    .bind(novo.metpag_id)
    .fetch_optional(&mut **tx)
    .await?;
    if metodo.is_none() {
        return Err(AppError::validacao("Método de pagamento inválido!"));
    }

    let id = query_scalar::<_, i32>(
        "INSERT INTO pagamento (vendas_id, metpag_id, valor, data_pagamento) \
         VALUES ($1, $2, $3, $4) RETURNING id_pag",
    )
    .bind(venda_id)
    .bind(novo.metpag_id)
    .bind(&novo.valor)
    .bind(agora())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| traduzir_violacao(e, "Pagamento duplicado!", "Método de pagamento inválido!"))?;
    Ok(id)
}

/// Exclusão lógica de um pagamento de venda do usuário.
pub async fn excluir(pool: &PgPool, usuario_id: i32, pagamento_id: i32) -> Result<bool, AppError> {
    let resultado = query(
        "UPDATE pagamento p SET ativo = FALSE FROM vendas v \
         WHERE p.id_pag = $1 AND p.ativo = TRUE AND v.id_vendas = p.vendas_id AND v.usuario_id = $2",
    )
    .bind(pagamento_id)
    .bind(usuario_id)
    .execute(pool)
    .await?;
    Ok(resultado.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::teste_util::{criar_usuario, dados_venda, id_da_categoria, id_do_metodo};
    use crate::vendas::vendas_repository;

    async fn venda_de(pool: &PgPool, usuario_id: i32) -> i32 {
        let categoria = id_da_categoria(pool, "Revenda de Mercadorias").await;
        vendas_repository::inserir(pool, usuario_id, &dados_venda(categoria, "100.00", None))
            .await
            .unwrap()
    }

    fn quarenta_reais(metpag_id: i32) -> NovoPagamento {
        NovoPagamento { metpag_id, valor: BigDecimal::from(40) }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn pagamento_em_venda_excluida_e_recusado(pool: PgPool) {
        let usuario = criar_usuario(&pool, "11111111111").await;
        let venda = venda_de(&pool, usuario).await;
        let metodo = id_do_metodo(&pool, "PIX").await;
        vendas_repository::excluir(&pool, usuario, venda).await.unwrap();

        let erro = inserir(&pool, usuario, venda, &quarenta_reais(metodo)).await.unwrap_err();
        assert_eq!(erro.mensagem_usuario(), "Venda não encontrada!");
        assert!(listar_por_venda(&pool, venda).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn pagamento_exige_venda_propria_e_metodo_ativo(pool: PgPool) {
        let dono = criar_usuario(&pool, "11111111111").await;
        let outro = criar_usuario(&pool, "22222222222").await;
        let venda = venda_de(&pool, dono).await;
        let metodo = id_do_metodo(&pool, "PIX").await;

        let erro = inserir(&pool, outro, venda, &quarenta_reais(metodo)).await.unwrap_err();
        assert_eq!(erro.mensagem_usuario(), "Venda não encontrada!");

        excluir_metodo(&pool, metodo).await.unwrap();
        let erro = inserir(&pool, dono, venda, &quarenta_reais(metodo)).await.unwrap_err();
        assert_eq!(erro.mensagem_usuario(), "Método de pagamento inválido!");

        let dinheiro = id_do_metodo(&pool, "Dinheiro").await;
        inserir(&pool, dono, venda, &quarenta_reais(dinheiro)).await.unwrap();
        let pagamentos = listar_por_venda(&pool, venda).await.unwrap();
        assert_eq!(pagamentos.len(), 1);
        assert_eq!(pagamentos[0].metodo, "Dinheiro");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn pagamento_so_e_excluido_pelo_dono_da_venda(pool: PgPool) {
        let dono = criar_usuario(&pool, "11111111111").await;
        let outro = criar_usuario(&pool, "22222222222").await;
        let venda = venda_de(&pool, dono).await;
        let metodo = id_do_metodo(&pool, "PIX").await;
        let pagamento = inserir(&pool, dono, venda, &quarenta_reais(metodo)).await.unwrap();

        assert!(!excluir(&pool, outro, pagamento).await.unwrap());
        assert_eq!(listar_por_venda(&pool, venda).await.unwrap().len(), 1);

        assert!(excluir(&pool, dono, pagamento).await.unwrap());
        assert!(listar_por_venda(&pool, venda).await.unwrap().is_empty());
    }
}
