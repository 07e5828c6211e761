// src/pagamentos/mod.rs

pub mod pagamento_structs;
pub mod pagamento_repository;
pub mod metodo_pagamento_router;
pub mod pagamento_router;
