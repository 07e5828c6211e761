// src/relatorio/mod.rs

pub mod relatorio_structs;
pub mod relatorio_pdf;
pub mod relatorio_router;
