//! # Rotulação por Token
//!
//! Reduz cada linha da matriz de scores à melhor classe (argmax) e traduz o
//! índice vencedor para o nome do idioma via [`LabelEncoder`].
//!
//! Empates são resolvidos pelo **menor índice**: a primeira ocorrência do
//! valor máximo vence. Uma linha toda zerada, portanto, recebe a classe 0.

use serde::{Deserialize, Serialize};

use crate::error::LabelError;
use crate::label_encoder::LabelEncoder;
use crate::ngram::ScoreMatrix;
use crate::tokenizer::Token;

/// Um token com o idioma atribuído.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledToken {
    pub label: String,
    pub token: Token,
}

/// Índice do maior valor; a primeira ocorrência vence em caso de empate.
pub fn argmax(row: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate().skip(1) {
        if v > row[best] {
            best = i;
        }
    }
    best
}

/// Rotula cada token pelo argmax da sua linha na matriz.
pub fn label_tokens(
    tokens: &[Token],
    scores: &ScoreMatrix,
    encoder: &LabelEncoder,
) -> Result<Vec<LabeledToken>, LabelError> {
    tokens
        .iter()
        .zip(scores.iter_rows())
        .map(|(token, row)| {
            let label = encoder.inverse_transform(argmax(row))?;
            Ok(LabeledToken {
                label: label.to_string(),
                token: token.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_argmax_first_occurrence_wins() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.0, 0.3, 0.3]), 1);
        assert_eq!(argmax(&[0.0, 0.0]), 0);
    }

    #[test]
    fn test_label_tokens() {
        let le = LabelEncoder::new(["english", "yoruba"]).unwrap();
        let tokens = tokenize("bawo ni");
        let mut m = ScoreMatrix::zeros(tokens.len(), 2);
        m.add_to_rows(0..2, &[0.2, 0.8]);

        let labeled = label_tokens(&tokens, &m, &le).unwrap();
        let labels: Vec<&str> = labeled.iter().map(|l| l.label.as_str()).collect();
        // O terminal tem linha zerada → classe 0
        assert_eq!(labels, vec!["yoruba", "yoruba", "english"]);
        assert_eq!(labeled[1].token.text, "ni");
    }
}
