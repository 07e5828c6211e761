// src/main.rs

use actix_web::{middleware, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod categorias; // Categorias de receita do MEI
mod config;
mod dashboard;
mod historico;
mod pagamentos; // Métodos de pagamento e pagamentos de vendas
mod relatorio; // Relatório mensal em PDF
mod rotas;
mod shared;
mod usuarios; // Cadastro, login, sessão e perfil
mod vendas; // Vendas e notas fiscais

use config::Config;

/// Estado compartilhado entre as rotas.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    /// Chave secreta que assina o token de sessão.
    pub jwt_secret: String,
    /// Duração da sessão, em minutos.
    pub sessao_minutos: i64,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // `.env` é opcional; variáveis já definidas no ambiente prevalecem.
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuração inválida: {}", e);
            std::process::exit(1);
        }
    };

    // Também recebe os eventos do `log` emitidos pelo middleware::Logger.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_conexoes)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!(erro = ?e, "falha ao conectar ao PostgreSQL");
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;

    sqlx::migrate!().run(&db_pool).await.map_err(|e| {
        tracing::error!(erro = ?e, "falha ao aplicar migrações");
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let app_state = web::Data::new(AppState {
        db_pool,
        jwt_secret: config.jwt_secret.clone(),
        sessao_minutos: config.sessao_minutos,
    });

    tracing::info!(endereco = %config.bind_addr, "iniciando MEI Contábil");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(rotas::configurar)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
