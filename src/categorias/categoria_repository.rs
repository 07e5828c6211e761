// src/categorias/categoria_repository.rs

use sqlx::{query_as, PgPool};

use super::categoria_structs::Categoria;
use crate::shared::erro::AppError;

/// Categorias ativas, em ordem alfabética. É a lista usada nos formulários de venda.
pub async fn listar(pool: &PgPool) -> Result<Vec<Categoria>, AppError> {
    let categorias = query_as::<_, Categoria>(
        "SELECT id_categoria, nome_categoria, ativo FROM categoria WHERE ativo = TRUE ORDER BY nome_categoria",
    )
    .fetch_all(pool)
    .await?;
    Ok(categorias)
}

/// Todas as categorias, inclusive as excluídas logicamente.
pub async fn listar_todas(pool: &PgPool) -> Result<Vec<Categoria>, AppError> {
    let categorias = query_as::<_, Categoria>(
        "SELECT id_categoria, nome_categoria, ativo FROM categoria ORDER BY nome_categoria",
    )
    .fetch_all(pool)
    .await?;
    Ok(categorias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::query;

    #[sqlx::test(migrations = "./migrations")]
    async fn categoria_excluida_some_apenas_da_lista_ativa(pool: PgPool) {
        query("UPDATE categoria SET ativo = FALSE WHERE nome_categoria = 'Produtos Industrializados'")
            .execute(&pool)
            .await
            .unwrap();

        let ativas: Vec<String> = listar(&pool).await.unwrap().into_iter().map(|c| c.nome_categoria).collect();
        assert_eq!(ativas, ["Prestação de Serviços", "Revenda de Mercadorias"]);

        let todas = listar_todas(&pool).await.unwrap();
        assert_eq!(todas.len(), 3);
        assert!(todas.iter().any(|c| c.nome_categoria == "Produtos Industrializados" && !c.ativo));
    }
}
