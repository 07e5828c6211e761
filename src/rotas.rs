// src/rotas.rs

use actix_web::web;

use crate::categorias::categoria_router;
use crate::dashboard::dashboard_router;
use crate::historico::historico_router;
use crate::pagamentos::{metodo_pagamento_router, pagamento_router};
use crate::relatorio::relatorio_router;
use crate::usuarios::{perfil_router, usuario_router};
use crate::vendas::{nota_fiscal_router, venda_router};

/// Registra todas as rotas da aplicação. Usada pelo servidor e pelos testes.
pub fn configurar(cfg: &mut web::ServiceConfig) {
    cfg
        // Módulo de Usuários
        .service(usuario_router::exibir_login)
        .service(usuario_router::processar_login)
        .service(usuario_router::exibir_cadastro)
        .service(usuario_router::processar_cadastro)
        .service(usuario_router::logout)
        .service(perfil_router::exibir_perfil)
        .service(perfil_router::salvar_perfil)
        // Módulo de Categorias (/categorias/todas antes de /categorias/{id})
        .service(categoria_router::cadastrar_categoria)
        .service(categoria_router::buscar_categorias)
        .service(categoria_router::buscar_todas_categorias)
        .service(categoria_router::buscar_categoria_por_id)
        .service(categoria_router::atualizar_categoria)
        .service(categoria_router::deletar_categoria)
        // Módulo de Pagamentos
        .service(metodo_pagamento_router::cadastrar_metodo)
        .service(metodo_pagamento_router::buscar_metodos)
        .service(metodo_pagamento_router::buscar_metodo_por_id)
        .service(metodo_pagamento_router::atualizar_metodo)
        .service(metodo_pagamento_router::deletar_metodo)
        .service(pagamento_router::listar_pagamentos)
        .service(pagamento_router::registrar_pagamento)
        .service(pagamento_router::excluir_pagamento)
        // Módulo de Vendas
        .service(venda_router::exibir_venda)
        .service(venda_router::salvar_venda)
        .service(nota_fiscal_router::listar_notas)
        .service(nota_fiscal_router::buscar_nota)
        // Páginas
        .service(dashboard_router::exibir_dashboard)
        .service(dashboard_router::venda_rapida)
        .service(historico_router::exibir_historico)
        .service(historico_router::filtrar_historico)
        .service(relatorio_router::exibir_relatorio)
        .service(relatorio_router::gerar_relatorio);
}
