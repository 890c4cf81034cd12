//! # Erros do Segmentador
//!
//! Todos os erros são propagados de forma síncrona para quem chamou
//! [`NgramSegmenter::extract`](crate::segmenter::NgramSegmenter::extract).
//! Nenhum erro é engolido e nenhum resultado parcial é devolvido: um prefixo
//! de spans sem o contexto da suavização final poderia enganar o consumidor.

use thiserror::Error;

/// Erro devolvido por uma implementação de [`Classifier`](crate::classifier::Classifier).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClassifierError {
    pub message: String,
}

impl ClassifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Falhas do [`LabelEncoder`](crate::label_encoder::LabelEncoder).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("índice de classe {index} fora do intervalo (total de classes: {len})")]
    UnknownIndex { index: usize, len: usize },
    #[error("classe desconhecida: {0}")]
    UnknownClass(String),
    #[error("classe duplicada: {0}")]
    DuplicateClass(String),
    #[error("nome de classe vazio")]
    EmptyClass,
    #[error("o codificador precisa de pelo menos uma classe")]
    NoClasses,
}

/// Falhas ao carregar um modelo (léxico ou codificador) do disco.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("erro de I/O ao ler {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("modelo inválido: {0}")]
    Invalid(String),
}

/// Erro principal de uma chamada de segmentação.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// Parâmetro fora do domínio (`ngram == 0`, `k == 0`) ou texto vazio após normalização.
    #[error("parâmetro inválido: {message}")]
    InvalidParameter { message: String },
    /// O classificador falhou ou devolveu um vetor inválido para uma janela.
    #[error("falha de classificação na janela \"{window}\": {message}")]
    FailedClassification { window: String, message: String },
    /// O codificador de rótulos e o classificador discordam sobre o número de classes.
    #[error("espaço de rótulos inconsistente: codificador com {encoder} classes, classificador com {classifier}")]
    InconsistentLabelSpace { encoder: usize, classifier: usize },
    #[error(transparent)]
    Label(#[from] LabelError),
}

impl SegmentError {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub(crate) fn failed_classification(window: &str, message: impl std::fmt::Display) -> Self {
        Self::FailedClassification {
            window: window.to_string(),
            message: message.to_string(),
        }
    }
}
