//! # Classificadores de Idioma
//!
//! O segmentador não conhece nenhum modelo concreto: ele consome a
//! capacidade [`Classifier`] ("dado um texto, devolva uma probabilidade por
//! classe conhecida"). Qualquer implementação serve, de um modelo
//! estatístico a uma tabela de consulta, o que permite substituir o modelo
//! por um stub determinístico nos testes.
//!
//! ## Componentes
//!
//! - [`ClassifierAdapter`]: envolve um classificador e valida cada vetor
//!   devolvido (tamanho `C`, valores finitos e não-negativos).
//! - [`Pipeline`]: normaliza o texto e só então classifica (pré-processo → modelo).
//! - [`LexiconClassifier`]: classificador por léxico carregado de JSON.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{ClassifierError, LabelError, ModelLoadError, SegmentError};
use crate::label_encoder::LabelEncoder;
use crate::normalize::{fold_diacritics, Normalizer};

/// Capacidade de pontuar um texto sobre um conjunto fixo de classes.
///
/// Implementações devem ser determinísticas: o mesmo texto, pontuado
/// repetidas vezes, deve produzir o mesmo vetor.
pub trait Classifier: Send + Sync {
    /// Número de classes `C`, fixo na construção.
    fn n_classes(&self) -> usize;

    /// Probabilidade (ou score monotônico) de cada uma das `C` classes.
    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ClassifierError>;
}

impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    fn n_classes(&self) -> usize {
        (**self).n_classes()
    }

    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
        (**self).predict_proba(text)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn n_classes(&self) -> usize {
        (**self).n_classes()
    }

    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
        (**self).predict_proba(text)
    }
}

/// Adaptador que garante o contrato do classificador para o agregador.
///
/// Falha rápido em vez de truncar ou completar vetores de tamanho errado.
pub struct ClassifierAdapter<C> {
    inner: C,
    n_classes: usize,
}

impl<C: Classifier> ClassifierAdapter<C> {
    /// Verifica que o classificador e o codificador concordam sobre `C`.
    pub fn new(inner: C, encoder: &LabelEncoder) -> Result<Self, SegmentError> {
        let n_classes = inner.n_classes();
        if n_classes != encoder.len() {
            return Err(SegmentError::InconsistentLabelSpace {
                encoder: encoder.len(),
                classifier: n_classes,
            });
        }
        Ok(Self { inner, n_classes })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Pontua o texto de uma janela.
    pub fn score(&self, text: &str) -> Result<Vec<f64>, SegmentError> {
        let probs = self
            .inner
            .predict_proba(text)
            .map_err(|e| SegmentError::failed_classification(text, e))?;

        if probs.len() != self.n_classes {
            return Err(SegmentError::failed_classification(
                text,
                format!(
                    "vetor com {} valores, esperado {}",
                    probs.len(),
                    self.n_classes
                ),
            ));
        }
        if let Some(bad) = probs.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(SegmentError::failed_classification(
                text,
                format!("valor inválido no vetor de probabilidades: {bad}"),
            ));
        }
        Ok(probs)
    }
}

/// Composição normalizador → classificador.
///
/// É ela mesma um [`Classifier`], então pode ser entregue diretamente ao segmentador.
pub struct Pipeline<N, C> {
    normalizer: N,
    classifier: C,
}

impl<N: Normalizer, C: Classifier> Pipeline<N, C> {
    pub fn new(normalizer: N, classifier: C) -> Self {
        Self {
            normalizer,
            classifier,
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl<N: Normalizer, C: Classifier> Classifier for Pipeline<N, C> {
    fn n_classes(&self) -> usize {
        self.classifier.n_classes()
    }

    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
        let normalized = self.normalizer.normalize(text);
        self.classifier.predict_proba(&normalized)
    }
}

fn default_smoothing() -> f64 {
    0.1
}

/// Formato em disco do léxico.
///
/// ```json
/// {
///   "classes": ["english", "hausa"],
///   "words": { "english": ["the", "is"], "hausa": ["da", "ya"] },
///   "smoothing": 0.1
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LexiconSpec {
    pub classes: Vec<String>,
    #[serde(default)]
    pub words: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
}

/// Classificador por tabela de consulta.
///
/// Cada palavra do texto vota em todas as classes cujo léxico a contém; um
/// valor de suavização é somado a todas as classes e o resultado é
/// normalizado para uma distribuição de probabilidade. As entradas do léxico
/// são guardadas em minúsculas e sem diacríticos, a mesma forma produzida
/// pelo [`Preprocess`](crate::normalize::Preprocess) padrão.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    encoder: LabelEncoder,
    lexicon: HashMap<String, Vec<usize>>,
    smoothing: f64,
}

impl LexiconClassifier {
    pub fn from_spec(spec: LexiconSpec) -> Result<Self, ModelLoadError> {
        let encoder = LabelEncoder::from_ordered(spec.classes)?;
        if !spec.smoothing.is_finite() || spec.smoothing < 0.0 {
            return Err(ModelLoadError::Invalid(format!(
                "smoothing deve ser finito e não-negativo, recebido {}",
                spec.smoothing
            )));
        }

        let mut lexicon: HashMap<String, Vec<usize>> = HashMap::new();
        for (class, words) in &spec.words {
            let index = encoder.transform(class)?;
            for word in words {
                let key = fold_diacritics(&word.to_lowercase());
                let entry = lexicon.entry(key).or_default();
                if !entry.contains(&index) {
                    entry.push(index);
                }
            }
        }

        Ok(Self {
            encoder,
            lexicon,
            smoothing: spec.smoothing,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelLoadError> {
        let spec: LexiconSpec = serde_json::from_str(json)?;
        Self::from_spec(spec)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Codificador com as classes do léxico, na ordem do vetor de saída.
    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Classes em que a palavra aparece no léxico.
    pub fn lookup(&self, word: &str) -> Result<Vec<&str>, LabelError> {
        match self.lexicon.get(word) {
            Some(indices) => indices
                .iter()
                .map(|&i| self.encoder.inverse_transform(i))
                .collect(),
            None => Ok(Vec::new()),
        }
    }
}

impl Classifier for LexiconClassifier {
    fn n_classes(&self) -> usize {
        self.encoder.len()
    }

    fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
        let n = self.encoder.len();
        let mut counts = vec![self.smoothing; n];
        for word in text.split_whitespace() {
            if let Some(indices) = self.lexicon.get(word) {
                for &i in indices {
                    counts[i] += 1.0;
                }
            }
        }

        let total: f64 = counts.iter().sum();
        if total == 0.0 {
            return Ok(vec![1.0 / n as f64; n]);
        }
        Ok(counts.into_iter().map(|c| c / total).collect())
    }
}
