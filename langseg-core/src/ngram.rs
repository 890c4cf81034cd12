//! # Agregação de Evidência por N-gramas
//!
//! Uma janela de largura fixa desliza sobre a sequência de tokens. Cada
//! janela é pontuada pelo classificador e o vetor de probabilidades
//! resultante é **somado** em todas as linhas da matriz de scores cobertas
//! pela janela.
//!
//! ## Por que somar e não tirar a média?
//!
//! Tokens perto das bordas são cobertos por menos janelas e recebem, de
//! propósito, menos evidência. A soma preserva essa confiança menor.
//!
//! ## Janelas
//!
//! ```text
//! tokens:   t0  t1  t2  t3  t4  t5      (N = 6, largura = 3)
//! janela 0: [t0  t1  t2]
//! janela 1:     [t1  t2  t3]
//! janela 2:         [t2  t3  t4]
//! ```
//!
//! Os inícios vão de `0` a `N - largura - 1`. Com `N <= largura` não há
//! janelas e a matriz fica zerada.
//!
//! ## Paralelismo
//!
//! A soma é comutativa, então as janelas podem ser pontuadas em paralelo
//! (via Rayon). A acumulação na matriz é sempre feita depois, em série e na
//! ordem das janelas, o que mantém o resultado idêntico bit a bit ao modo sequencial.

use std::ops::Range;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::classifier::{Classifier, ClassifierAdapter};
use crate::error::SegmentError;
use crate::tokenizer::{join_tokens, Token};

/// Uma janela de `width` índices consecutivos começando em `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramWindow {
    pub start: usize,
    pub width: usize,
}

impl NgramWindow {
    pub fn end(&self) -> usize {
        self.start + self.width
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Enumera as janelas de largura `width` para uma sequência de `len` tokens.
pub fn ngram_windows(len: usize, width: usize) -> Vec<NgramWindow> {
    (0..len.saturating_sub(width))
        .map(|start| NgramWindow { start, width })
        .collect()
}

/// Matriz `N × C` de massa de probabilidade acumulada.
///
/// Começa zerada e só é incrementada, nunca decrementada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScoreMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn n_classes(&self) -> usize {
        self.cols
    }

    pub fn row(&self, t: usize) -> &[f64] {
        &self.data[t * self.cols..(t + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Soma `probs` em cada linha de `rows`.
    pub fn add_to_rows(&mut self, rows: Range<usize>, probs: &[f64]) {
        debug_assert_eq!(probs.len(), self.cols);
        for t in rows {
            let row = &mut self.data[t * self.cols..(t + 1) * self.cols];
            for (cell, p) in row.iter_mut().zip(probs) {
                *cell += p;
            }
        }
    }
}

/// Resultado da pontuação de uma janela.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowScore {
    pub window: NgramWindow,
    /// Texto dos tokens da janela unidos por espaço.
    pub text: String,
    pub probabilities: Vec<f64>,
}

/// Pontua todas as janelas. Qualquer falha aborta a agregação inteira.
pub fn score_windows<C: Classifier>(
    tokens: &[Token],
    windows: &[NgramWindow],
    adapter: &ClassifierAdapter<C>,
    parallel: bool,
) -> Result<Vec<WindowScore>, SegmentError> {
    let score_one = |window: &NgramWindow| -> Result<WindowScore, SegmentError> {
        let text = join_tokens(&tokens[window.indices()]);
        let probabilities = adapter.score(&text)?;
        trace!(start = window.start, text = %text, "janela pontuada");
        Ok(WindowScore {
            window: *window,
            text,
            probabilities,
        })
    };

    if parallel {
        windows.par_iter().map(score_one).collect()
    } else {
        windows.iter().map(score_one).collect()
    }
}

/// Acumula as pontuações numa matriz `n_tokens × n_classes`.
pub fn accumulate(n_tokens: usize, n_classes: usize, scores: &[WindowScore]) -> ScoreMatrix {
    let mut matrix = ScoreMatrix::zeros(n_tokens, n_classes);
    for score in scores {
        matrix.add_to_rows(score.window.indices(), &score.probabilities);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifierError;
    use crate::label_encoder::LabelEncoder;
    use crate::tokenizer::tokenize;

    /// [1, 0] quando a janela contém "hello", [0, 1] caso contrário.
    struct HelloStub;

    impl Classifier for HelloStub {
        fn n_classes(&self) -> usize {
            2
        }

        fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
            if text.split(' ').any(|w| w == "hello") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
        }
    }

    struct FailsOn(&'static str);

    impl Classifier for FailsOn {
        fn n_classes(&self) -> usize {
            2
        }

        fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
            if text.contains(self.0) {
                Err(ClassifierError::new("falha simulada"))
            } else {
                Ok(vec![0.5, 0.5])
            }
        }
    }

    fn adapter<C: Classifier>(c: C) -> ClassifierAdapter<C> {
        let le = LabelEncoder::new(["a", "b"]).unwrap();
        ClassifierAdapter::new(c, &le).unwrap()
    }

    #[test]
    fn test_window_enumeration() {
        let windows = ngram_windows(6, 3);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].indices(), 0..3);
        assert_eq!(windows[2].indices(), 2..5);
        // Janelas vizinhas se sobrepõem em largura - 1 posições
        assert_eq!(windows[1].start, windows[0].start + 1);
    }

    #[test]
    fn test_no_windows_when_sequence_is_short() {
        assert!(ngram_windows(3, 3).is_empty());
        assert!(ngram_windows(2, 6).is_empty());
    }

    #[test]
    fn test_accumulation_sums_overlapping_windows() {
        // hello world hello world .  → janelas [0,1] [1,2] [2,3], todas com "hello"
        let tokens = tokenize("hello world hello world");
        let windows = ngram_windows(tokens.len(), 2);
        let scores = score_windows(&tokens, &windows, &adapter(HelloStub), false).unwrap();
        let m = accumulate(tokens.len(), 2, &scores);

        assert_eq!(m.row(0), &[1.0, 0.0]);
        assert_eq!(m.row(1), &[2.0, 0.0]);
        assert_eq!(m.row(2), &[2.0, 0.0]);
        assert_eq!(m.row(3), &[1.0, 0.0]);
        // O token terminal nunca é coberto por uma janela
        assert_eq!(m.row(4), &[0.0, 0.0]);
    }

    #[test]
    fn test_window_text_is_space_joined() {
        let tokens = tokenize("a b c d");
        let windows = ngram_windows(tokens.len(), 3);
        let scores = score_windows(&tokens, &windows, &adapter(HelloStub), false).unwrap();
        let texts: Vec<&str> = scores.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a b c", "b c d"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let text = "hello there world hello again and again world hello x y z";
        let tokens = tokenize(text);
        let windows = ngram_windows(tokens.len(), 3);
        let seq = score_windows(&tokens, &windows, &adapter(HelloStub), false).unwrap();
        let par = score_windows(&tokens, &windows, &adapter(HelloStub), true).unwrap();
        assert_eq!(seq, par);
        assert_eq!(
            accumulate(tokens.len(), 2, &seq),
            accumulate(tokens.len(), 2, &par)
        );
    }

    #[test]
    fn test_any_window_failure_aborts() {
        let tokens = tokenize("um dois tres quatro cinco");
        let windows = ngram_windows(tokens.len(), 2);
        for parallel in [false, true] {
            let result = score_windows(&tokens, &windows, &adapter(FailsOn("quatro")), parallel);
            assert!(matches!(
                result,
                Err(SegmentError::FailedClassification { .. })
            ));
        }
    }

    #[test]
    fn test_iter_rows() {
        let mut m = ScoreMatrix::zeros(3, 2);
        m.add_to_rows(1..3, &[0.25, 0.75]);
        let rows: Vec<&[f64]> = m.iter_rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], &[0.25, 0.75]);
    }
}
