//! # Parâmetros e Configuração
//!
//! - [`SegmentParams`]: parâmetros de uma chamada (`ngram`, `k`). Desserializa
//!   com defaults, então pode ser embutido direto num corpo de requisição JSON.
//! - [`SegmenterConfig`]: configuração de longa duração do segmentador.

use serde::{Deserialize, Serialize};

use crate::error::SegmentError;

pub const DEFAULT_NGRAM: usize = 6;
pub const DEFAULT_K: usize = 4;

fn default_ngram() -> usize {
    DEFAULT_NGRAM
}

fn default_k() -> usize {
    DEFAULT_K
}

/// Parâmetros de uma chamada de segmentação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentParams {
    /// Largura da janela de n-gramas.
    #[serde(default = "default_ngram")]
    pub ngram: usize,
    /// Comprimento mínimo aceitável de um span (limiar de suavização).
    /// Deve ser menor para textos muito curtos.
    #[serde(default = "default_k")]
    pub k: usize,
}

impl SegmentParams {
    pub fn new(ngram: usize, k: usize) -> Self {
        Self { ngram, k }
    }

    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.ngram == 0 {
            return Err(SegmentError::invalid_parameter("ngram deve ser maior que zero"));
        }
        if self.k == 0 {
            return Err(SegmentError::invalid_parameter("k deve ser maior que zero"));
        }
        Ok(())
    }
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            ngram: DEFAULT_NGRAM,
            k: DEFAULT_K,
        }
    }
}

/// Configuração do segmentador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Pontua as janelas em paralelo (Rayon).
    pub parallel: bool,
    /// Abaixo deste número de janelas a pontuação é sempre sequencial.
    pub min_parallel_windows: usize,
}

impl SegmenterConfig {
    pub fn use_parallel(&self, n_windows: usize) -> bool {
        self.parallel && n_windows >= self.min_parallel_windows
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_windows: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults_from_json() {
        let p: SegmentParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p, SegmentParams::new(6, 4));
        let p: SegmentParams = serde_json::from_str(r#"{"k": 2}"#).unwrap();
        assert_eq!(p, SegmentParams::new(6, 2));
    }

    #[test]
    fn test_params_validation() {
        assert!(SegmentParams::default().validate().is_ok());
        assert!(matches!(
            SegmentParams::new(0, 4).validate(),
            Err(SegmentError::InvalidParameter { .. })
        ));
        assert!(matches!(
            SegmentParams::new(6, 0).validate(),
            Err(SegmentError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_parallel_threshold() {
        let cfg = SegmenterConfig::default();
        assert!(!cfg.use_parallel(10));
        assert!(cfg.use_parallel(64));
        let off = SegmenterConfig {
            parallel: false,
            ..cfg
        };
        assert!(!off.use_parallel(1000));
    }
}
