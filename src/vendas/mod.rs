// src/vendas/mod.rs

pub mod periodo;
pub mod vendas_structs;
pub mod vendas_repository;
pub mod venda_router;
pub mod nota_fiscal_router;
