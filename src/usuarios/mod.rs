// src/usuarios/mod.rs

// Declara o submódulo que contém as definições das structs de usuários
pub mod usuario_structs;
// Declara o submódulo com as consultas SQL da tabela usuario
pub mod usuario_repository;
// Declara o submódulo que contém as rotas de login, cadastro e logout
pub mod usuario_router;
// Rotas da página de perfil
pub mod perfil_router;
// Declara o submódulo para o extrator de autenticação (token de sessão)
pub mod auth_middleware;
