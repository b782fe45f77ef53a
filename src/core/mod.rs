pub mod builder;
pub mod generator;
pub mod lexer;
