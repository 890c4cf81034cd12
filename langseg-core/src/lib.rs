//! # langseg-core — Segmentação de Texto Multilíngue por Idioma
//!
//! Este crate identifica, num texto que mistura idiomas, quais trechos
//! contíguos de palavras pertencem a qual idioma. Não depende de fronteiras
//! de sentença nem de dicionários por palavra: a evidência vem de um
//! classificador externo aplicado a janelas deslizantes de n-gramas.
//!
//! ## Arquitetura do Sistema
//!
//! O fluxo é linear, e nenhum estágio chama de volta um estágio anterior:
//!
//! 1.  **Entrada**: Texto bruto (String) + parâmetros `ngram` e `k`.
//! 2.  **Tokenização** ([`tokenizer`]): divisão por espaços, isolamento do `.` e token terminal sintético.
//! 3.  **Classificação** ([`classifier`]): cada janela de `ngram` tokens é pontuada por um [`Classifier`].
//! 4.  **Agregação** ([`ngram`]): as probabilidades são somadas em cada token coberto pela janela.
//! 5.  **Rotulação** ([`tagger`]): argmax por token, traduzido pelo [`LabelEncoder`].
//! 6.  **Spans** ([`span`]): agrupamento de rótulos iguais e suavização com limiar `k`.
//! 7.  **Saída**: Lista de [`Segment`] (ex: "ina kwana" -> hausa, "how are you" -> english).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use langseg_core::{LexiconClassifier, NgramSegmenter, Pipeline, Preprocess, SegmentParams};
//!
//! let lexicon = LexiconClassifier::from_json_str(r#"{
//!     "classes": ["english", "hausa"],
//!     "words": {
//!         "english": ["how", "are", "you", "today", "my", "friend"],
//!         "hausa": ["ina", "kwana", "lafiya", "lau", "yaya", "gida"]
//!     }
//! }"#).unwrap();
//! let encoder = lexicon.encoder().clone();
//!
//! // 1. Monta o segmentador (normalização → léxico)
//! let segmenter = NgramSegmenter::new(Pipeline::new(Preprocess::new(), lexicon), encoder).unwrap();
//!
//! // 2. Segmenta com janelas de 2 tokens e spans de pelo menos 2 tokens
//! let segments = segmenter
//!     .segment("Ina kwana lafiya lau how are you today my friend", SegmentParams::new(2, 2))
//!     .unwrap();
//!
//! for segment in &segments {
//!     println!("{} -> {}", segment.text, segment.label);
//! }
//! assert_eq!(segments.first().map(|s| s.label.as_str()), Some("hausa"));
//! ```
//!
//! ## Módulos Principais
//!
//! - [`segmenter`]: Orquestrador principal que conecta todos os estágios.
//! - [`span`]: Construção e suavização dos spans.
//! - [`ngram`]: Janelas deslizantes e matriz de scores.
//! - [`normalize`]: Limpeza de texto antes da classificação.

pub mod classifier;
pub mod config;
pub mod error;
pub mod label_encoder;
pub mod ngram;
pub mod normalize;
pub mod segmenter;
pub mod span;
pub mod tagger;
pub mod tokenizer;

pub use classifier::{Classifier, ClassifierAdapter, LexiconClassifier, Pipeline};
pub use config::{SegmentParams, SegmenterConfig};
pub use error::{ClassifierError, LabelError, ModelLoadError, SegmentError};
pub use label_encoder::LabelEncoder;
pub use normalize::{Normalizer, Preprocess};
pub use segmenter::{Extraction, NgramSegmenter, Segment, SegmentEvent};
pub use span::Span;
pub use tagger::LabeledToken;
pub use tokenizer::Token;
