// src/shared/mod.rs

// Envelope padrão das respostas JSON
pub mod shared_structs;
// Erro único da aplicação (thiserror + ResponseError)
pub mod erro;
// Mensagens flash e redirecionamentos
pub mod flash;
// Interpretação de campos de formulário
pub mod formulario;
// Formatação de moeda, datas e documentos
pub mod formato;

#[cfg(test)]
pub mod teste_util;
