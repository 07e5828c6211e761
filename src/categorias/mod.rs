// src/categorias/mod.rs

pub mod categoria_structs;
pub mod categoria_repository;
pub mod categoria_router;
