//! # Tokenizador por Espaços
//!
//! Divide o texto bruto em tokens separados por espaço em branco. Não há
//! dicionário nem regras morfológicas: a unidade mínima do segmentador é a
//! palavra tal como aparece no texto.
//!
//! ## Preparação do texto
//!
//! Antes de dividir, o texto passa por três ajustes:
//!
//! 1. Todo `.` ganha espaço antes e depois, isolando a pontuação final da
//!    palavra ("mundo." → "mundo", ".").
//! 2. Um token terminal sintético `" ."` é anexado ao fim. Ele garante que a
//!    sequência nunca seja vazia e que a última janela de n-gramas alcance o
//!    último token real. O segmentador o remove antes de devolver o resultado.
//! 3. Sequências de espaço em branco viram um único espaço.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use langseg_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("Bawo ni. How are you");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["Bawo", "ni", ".", "How", "are", "you", "."]);
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Texto do token terminal sintético anexado ao fim de toda sequência.
pub const TERMINAL_TOKEN: &str = ".";

/// Um token extraído do texto preparado.
///
/// A posição na sequência (`index`) é a identidade do token para fins de
/// pontuação: tokens nunca são fundidos nem divididos depois de criados.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// O texto do token (ex: "ina", "kwana", ".").
    pub text: String,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

fn spaces() -> &'static Regex {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    SPACES.get_or_init(|| Regex::new(r"\s+").expect("regex de espaços é válida"))
}

/// Aplica os ajustes de borda descritos no módulo e devolve o texto pronto
/// para divisão, com um único espaço entre tokens.
pub fn prepare_text(text: &str) -> String {
    let mut prepared = text.replace('.', " . ");
    prepared.push(' ');
    prepared.push_str(TERMINAL_TOKEN);
    spaces().replace_all(prepared.trim_start(), " ").into_owned()
}

/// Tokeniza o texto, incluindo o token terminal sintético como último elemento.
pub fn tokenize(text: &str) -> Vec<Token> {
    prepare_text(text)
        .split_whitespace()
        .enumerate()
        .map(|(index, word)| Token {
            text: word.to_string(),
            index,
        })
        .collect()
}

/// Junta o texto dos tokens com um único espaço.
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_appends_terminal() {
        let tokens = tokenize("hello world");
        assert_eq!(texts(&tokens), vec!["hello", "world", "."]);
        assert_eq!(tokens.last().map(|t| t.index), Some(2));
    }

    #[test]
    fn test_tokenize_isolates_periods() {
        let tokens = tokenize("Ina kwana.Lafiya lau");
        assert_eq!(texts(&tokens), vec!["Ina", "kwana", ".", "Lafiya", "lau", "."]);
    }

    #[test]
    fn test_tokenize_collapses_spaces() {
        let tokens = tokenize("a    b\n\tc");
        assert_eq!(texts(&tokens), vec!["a", "b", "c", "."]);
    }

    #[test]
    fn test_tokenize_empty_text_still_has_terminal() {
        let tokens = tokenize("   ");
        assert_eq!(texts(&tokens), vec!["."]);
    }

    #[test]
    fn test_prepare_text() {
        assert_eq!(prepare_text("a  b."), "a b . .");
        assert_eq!(prepare_text("  x.\ty"), "x . y .");
        assert_eq!(prepare_text("   "), ".");
    }

    #[test]
    fn test_join_tokens() {
        let tokens = tokenize("omo  I no know");
        assert_eq!(join_tokens(&tokens[..4]), "omo I no know");
    }
}
