// src/historico/mod.rs

pub mod historico_structs;
pub mod historico_router;
